use crate::traits::Progress;

/// A [`Progress`] sink that discards every update.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn update(&mut self, _downloaded: u64, _uploaded: u64) {}
}
