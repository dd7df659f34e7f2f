/// Walk engine — end points of single walks and repeated-trial distance samples.
///
/// The random source is always passed in by the caller; nothing here holds
/// or reaches for a global generator.

use log::debug;
use rand::prelude::Distribution;
use rand::Rng;
use thiserror::Error;

use crate::core::profile::{DirectionProfile, ProfileError};
use crate::core::stats::DistanceSample;
use crate::schema::point::Point;

#[derive(Debug, Error)]
pub enum WalkError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error(transparent)]
    Profile(#[from] ProfileError),
}

/// Walk `step_count` unit moves from the origin and return where it ends.
///
/// Each step draws one entry of `profile`, uniformly over its entries, so a
/// direction listed twice is twice as likely.
pub fn generate_end_point<R: Rng + ?Sized>(
    step_count: u32,
    profile: &DirectionProfile,
    rng: &mut R,
) -> Result<Point, WalkError> {
    let dist = profile.distribution()?;
    let mut point = Point::ORIGIN;
    for _ in 0..step_count {
        point = point.step(dist.sample(rng));
    }
    Ok(point)
}

/// `count` independent end points of walks of `step_count` steps.
pub fn end_points<R: Rng + ?Sized>(
    step_count: u32,
    count: usize,
    profile: &DirectionProfile,
    rng: &mut R,
) -> Result<Vec<Point>, WalkError> {
    let dist = profile.distribution()?;
    let points = (0..count)
        .map(|_| {
            (0..step_count).fold(Point::ORIGIN, |p, _| p.step(dist.sample(rng)))
        })
        .collect();
    Ok(points)
}

/// Run `trial_count` walks and collect each end point's distance from the
/// origin, in generation order.
pub fn run_trials<R: Rng + ?Sized>(
    step_count: u32,
    trial_count: u32,
    profile: &DirectionProfile,
    rng: &mut R,
) -> Result<DistanceSample, WalkError> {
    if trial_count == 0 {
        return Err(WalkError::InvalidArgument(
            "trial count must be at least 1".to_string(),
        ));
    }

    let distances: Vec<f64> = end_points(step_count, trial_count as usize, profile, rng)?
        .iter()
        .map(Point::distance_from_origin)
        .collect();

    debug!(
        "ran {} trials of {} steps over [{}]",
        trial_count,
        step_count,
        profile.describe()
    );
    Ok(DistanceSample::from(distances))
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::schema::direction::Direction;
    use proptest::prelude::*;
    use proptest::sample::select;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn any_profile() -> impl Strategy<Value = DirectionProfile> {
        proptest::collection::vec(select(Direction::ALL.to_vec()), 1..12)
            .prop_map(|entries| DirectionProfile::new(entries).unwrap())
    }

    fn east_west_profile() -> impl Strategy<Value = DirectionProfile> {
        proptest::collection::vec(select(vec![Direction::East, Direction::West]), 1..8)
            .prop_map(|entries| DirectionProfile::new(entries).unwrap())
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(300))]

        #[test]
        fn end_point_reachable_in_exact_steps(
            profile in any_profile(),
            steps in 0_u32..400,
            seed in 0_u64..10000,
        ) {
            let mut rng = StdRng::seed_from_u64(seed);
            let end = generate_end_point(steps, &profile, &mut rng).unwrap();
            let moved = end.manhattan();
            prop_assert!(moved <= steps as u64);
            prop_assert_eq!((steps as u64 - moved) % 2, 0);
        }

        #[test]
        fn east_west_entries_keep_y_at_zero(
            profile in east_west_profile(),
            steps in 0_u32..400,
            seed in 0_u64..10000,
        ) {
            let mut rng = StdRng::seed_from_u64(seed);
            let end = generate_end_point(steps, &profile, &mut rng).unwrap();
            prop_assert_eq!(end.y, 0);
        }

        #[test]
        fn trials_yield_one_non_negative_distance_each(
            profile in any_profile(),
            steps in 0_u32..100,
            trials in 1_u32..60,
            seed in 0_u64..10000,
        ) {
            let mut rng = StdRng::seed_from_u64(seed);
            let sample = run_trials(steps, trials, &profile, &mut rng).unwrap();
            prop_assert_eq!(sample.len(), trials as usize);
            prop_assert!(sample.as_slice().iter().all(|d| *d >= 0.0));
        }
    }
}
