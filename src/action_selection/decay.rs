use std::rc::Rc;

use super::Decay;

/// Linear walk from `start_value` to `stop_value` between `start_episode` and
/// `stop_episode`, clamped to `stop_value` afterwards.
///
/// The step is fixed at construction, so the function must be fed every
/// episode once and in increasing order to land on `stop_value`.
pub fn constant_decay(
    start_episode: usize,
    stop_episode: usize,
    start_value: f64,
    stop_value: f64,
) -> Decay {
    let delta_episode = (stop_episode as f64 + 1.0) - start_episode as f64;
    let delta: f64 = (stop_value - start_value) / delta_episode;
    Rc::new(move |value: f64, episode: usize| {
        if episode >= stop_episode {
            stop_value
        } else if episode >= start_episode {
            value + delta
        } else {
            value
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-11;

    #[test]
    fn walks_linearly_then_clamps() {
        let decay = constant_decay(1, 5, 0.5, 0.0);
        let expected = [0.5, 0.4, 0.3, 0.2, 0.1, 0.0, 0.0, 0.0];
        let mut value = 0.5;
        for (episode, e) in expected.iter().enumerate() {
            value = decay(value, episode);
            assert!((value - e).abs() < TOLERANCE, "episode {episode}: {value}");
        }
    }

    #[test]
    fn clamp_ignores_accumulated_value() {
        let decay = constant_decay(0, 10, 1.0, 0.25);
        assert_eq!(decay(123.0, 10), 0.25);
        assert_eq!(decay(-4.0, 50), 0.25);
    }

    #[test]
    fn can_grow_the_value() {
        let decay = constant_decay(0, 3, 1.0, 5.0);
        let mut value = 1.0;
        for episode in 0..3 {
            value = decay(value, episode);
        }
        assert!((value - 4.0).abs() < TOLERANCE);
        assert_eq!(decay(value, 3), 5.0);
    }

    #[test]
    fn skipped_episodes_miss_the_schedule() {
        let decay = constant_decay(1, 5, 0.5, 0.0);
        let value = decay(0.5, 1);
        let value = decay(value, 4);
        assert!((value - 0.3).abs() < TOLERANCE);
    }
}
