//! Track-advance policy
//!
//! A pure decision over the queue shape and the shuffle/repeat settings. The
//! session applies the outcome; nothing here touches hardware.

use crate::types::RepeatMode;
use rand::Rng;

/// What asked for a track change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdvanceTrigger {
    /// The current track played to its end
    NaturalEnd,
    /// The user pressed next
    UserNext,
    /// The user pressed previous
    UserPrevious,
}

/// Outcome of an advance decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Advance {
    /// Move the cursor to this index, load and play it
    Select(usize),
    /// Play the current track again from the start
    Replay,
    /// Seek the current track back to the start, cursor unchanged
    Restart,
    /// Nothing to do
    Stay,
    /// Playback is over: release the track and go idle
    Stop,
}

/// Decide the next track
///
/// `cursor` must be `None` or a valid index into a queue of `len` tracks.
pub fn decide<R: Rng + ?Sized>(
    len: usize,
    cursor: Option<usize>,
    shuffle: bool,
    repeat: RepeatMode,
    trigger: AdvanceTrigger,
    rng: &mut R,
) -> Advance {
    match trigger {
        AdvanceTrigger::UserPrevious => previous(len, cursor),
        AdvanceTrigger::UserNext => next(len, cursor, shuffle, repeat, rng),
        AdvanceTrigger::NaturalEnd => {
            if repeat == RepeatMode::One {
                Advance::Replay
            } else if repeat == RepeatMode::All || len > 1 {
                match next(len, cursor, shuffle, repeat, rng) {
                    // A one-track queue on repeat-all keeps playing that track
                    Advance::Stay if repeat == RepeatMode::All && len == 1 => Advance::Replay,
                    Advance::Stay => Advance::Stop,
                    other => other,
                }
            } else {
                Advance::Stop
            }
        }
    }
}

fn previous(len: usize, cursor: Option<usize>) -> Advance {
    match cursor {
        _ if len == 0 => Advance::Stay,
        None => Advance::Select(0),
        Some(0) => Advance::Restart,
        Some(i) => Advance::Select((i - 1).min(len - 1)),
    }
}

fn next<R: Rng + ?Sized>(
    len: usize,
    cursor: Option<usize>,
    shuffle: bool,
    repeat: RepeatMode,
    rng: &mut R,
) -> Advance {
    if len == 0 {
        return Advance::Stay;
    }

    if shuffle {
        return match cursor {
            _ if len <= 1 => Advance::Stay,
            Some(current) if current < len => {
                // Draw from the other len - 1 slots, skipping over `current`
                let pick = rng.gen_range(0..len - 1);
                Advance::Select(if pick >= current { pick + 1 } else { pick })
            }
            _ => Advance::Select(rng.gen_range(0..len)),
        };
    }

    match cursor {
        None => Advance::Select(0),
        Some(current) if current + 1 < len => Advance::Select(current + 1),
        Some(_) if repeat == RepeatMode::All => Advance::Select(0),
        Some(_) => Advance::Stop,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    fn run(
        len: usize,
        cursor: Option<usize>,
        shuffle: bool,
        repeat: RepeatMode,
        trigger: AdvanceTrigger,
    ) -> Advance {
        decide(len, cursor, shuffle, repeat, trigger, &mut rng())
    }

    #[test]
    fn previous_steps_back_without_wrapping() {
        use AdvanceTrigger::UserPrevious;
        assert_eq!(run(3, Some(2), false, RepeatMode::Off, UserPrevious), Advance::Select(1));
        assert_eq!(run(3, Some(0), false, RepeatMode::All, UserPrevious), Advance::Restart);
        assert_eq!(run(3, None, false, RepeatMode::Off, UserPrevious), Advance::Select(0));
        assert_eq!(run(0, None, false, RepeatMode::Off, UserPrevious), Advance::Stay);
    }

    #[test]
    fn next_in_order() {
        use AdvanceTrigger::UserNext;
        assert_eq!(run(3, Some(0), false, RepeatMode::Off, UserNext), Advance::Select(1));
        assert_eq!(run(3, Some(2), false, RepeatMode::All, UserNext), Advance::Select(0));
        assert_eq!(run(3, Some(2), false, RepeatMode::Off, UserNext), Advance::Stop);
        assert_eq!(run(3, Some(2), false, RepeatMode::One, UserNext), Advance::Stop);
        assert_eq!(run(0, None, false, RepeatMode::All, UserNext), Advance::Stay);
    }

    #[test]
    fn shuffle_next_with_one_track_is_noop() {
        assert_eq!(run(1, Some(0), true, RepeatMode::Off, AdvanceTrigger::UserNext), Advance::Stay);
    }

    #[test]
    fn natural_end_rules() {
        use AdvanceTrigger::NaturalEnd;
        assert_eq!(run(3, Some(1), false, RepeatMode::One, NaturalEnd), Advance::Replay);
        assert_eq!(run(3, Some(1), false, RepeatMode::Off, NaturalEnd), Advance::Select(2));
        assert_eq!(run(3, Some(2), false, RepeatMode::Off, NaturalEnd), Advance::Stop);
        assert_eq!(run(3, Some(2), false, RepeatMode::All, NaturalEnd), Advance::Select(0));
        assert_eq!(run(1, Some(0), false, RepeatMode::Off, NaturalEnd), Advance::Stop);
        assert_eq!(run(1, Some(0), false, RepeatMode::All, NaturalEnd), Advance::Select(0));
        assert_eq!(run(1, Some(0), true, RepeatMode::All, NaturalEnd), Advance::Replay);
        assert_eq!(run(1, Some(0), true, RepeatMode::Off, NaturalEnd), Advance::Stop);
    }

    #[test]
    fn shuffle_covers_every_other_index() {
        let mut rng = rng();
        let mut seen = [false; 5];
        for _ in 0..500 {
            match decide(5, Some(2), true, RepeatMode::Off, AdvanceTrigger::UserNext, &mut rng) {
                Advance::Select(i) => seen[i] = true,
                other => panic!("unexpected {other:?}"),
            }
        }
        assert_eq!(seen, [true, true, false, true, true]);
    }
}
