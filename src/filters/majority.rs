use std::collections::VecDeque;
use super::StudyFilter;

/// Sliding-window majority vote. Ties resolve to "not studying".
pub struct MajorityFilter {
    window_size: usize,
    buffer: VecDeque<bool>,
}

impl MajorityFilter {
    pub fn new(window_size: usize) -> Self {
        let window_size = window_size.max(1);
        Self {
            window_size,
            buffer: VecDeque::with_capacity(window_size),
        }
    }
}

impl StudyFilter for MajorityFilter {
    fn apply(&mut self, studying: bool) -> bool {
        if self.buffer.len() >= self.window_size {
            self.buffer.pop_front();
        }
        self.buffer.push_back(studying);

        let votes = self.buffer.iter().filter(|&&s| s).count();
        votes * 2 > self.buffer.len()
    }

    fn reset(&mut self) {
        self.buffer.clear();
    }

    fn name(&self) -> &str {
        "MajorityFilter"
    }
}
