//! Distinct-voter tally for one request.

use shared_types::Address;

/// Counts distinct voters until the threshold is reached.
#[derive(Clone, Debug)]
pub struct VoteTally {
    threshold: usize,
    voters: Vec<Address>,
}

impl VoteTally {
    pub fn new(threshold: usize) -> Self {
        Self {
            threshold,
            voters: Vec::with_capacity(threshold),
        }
    }

    /// Count `voter` once. Returns false if it already voted.
    pub fn record(&mut self, voter: Address) -> bool {
        if self.voters.contains(&voter) {
            return false;
        }
        self.voters.push(voter);
        true
    }

    pub fn has_voted(&self, voter: &Address) -> bool {
        self.voters.contains(voter)
    }

    pub fn count(&self) -> usize {
        self.voters.len()
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    pub fn is_met(&self) -> bool {
        self.voters.len() >= self.threshold
    }

    /// Accepted voters in the order they were counted.
    pub fn voters(&self) -> &[Address] {
        &self.voters
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_voter_counts_once() {
        let mut tally = VoteTally::new(2);
        assert!(tally.record([0xA1; 20]));
        assert!(!tally.record([0xA1; 20]));
        assert_eq!(tally.count(), 1);
        assert!(!tally.is_met());

        assert!(tally.record([0xB2; 20]));
        assert!(tally.is_met());
        assert_eq!(tally.voters(), &[[0xA1; 20], [0xB2; 20]]);
    }
}
