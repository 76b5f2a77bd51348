use super::StudyFilter;

/// Hysteresis filter: the output only changes after `required` consecutive
/// samples disagree with it. Starts out "not studying".
pub struct ConsecutiveFilter {
    required: usize,
    output: bool,
    streak: usize,
}

impl ConsecutiveFilter {
    pub fn new(required: usize) -> Self {
        Self {
            required: required.max(1),
            output: false,
            streak: 0,
        }
    }
}

impl StudyFilter for ConsecutiveFilter {
    fn apply(&mut self, studying: bool) -> bool {
        if studying == self.output {
            self.streak = 0;
            return self.output;
        }

        self.streak += 1;
        if self.streak >= self.required {
            self.output = studying;
            self.streak = 0;
        }
        self.output
    }

    fn reset(&mut self) {
        self.output = false;
        self.streak = 0;
    }

    fn name(&self) -> &str {
        "ConsecutiveFilter"
    }
}
