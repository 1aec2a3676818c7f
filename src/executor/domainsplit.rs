use crate::math::partition::Partition;
use crate::transport::communicator::{
    Rank,
    COORDINATOR_RANK
};

/// `n` 步分給 `parts` 份：`base = n / parts`，前 `remainder` 份各多一步。
///
/// index 0 是 coordinator，它在 `remainder > 0` 時一定拿到多的那一步；
/// 之後 index `j` 在 `j < remainder` 時才多一步。
pub fn split_counts(n: usize, parts: usize) -> Vec<usize> {
    debug_assert!(parts > 0);
    let base = n / parts;
    let remainder = n % parts;

    (0..parts)
        .map(|j| base + usize::from(j < remainder))
        .collect()
}

/// 整個 domain 切成連續、不重疊的 slice，依 rank 排列。
///
/// `n < P` 時後面幾個 worker 的 slice 為空；這些 worker 不會收到 Job。
#[derive(Debug, Clone)]
pub struct DomainSplit {
    slices: Vec<Partition>
}

impl DomainSplit {
    pub fn new(domain: &Partition, participants: usize) -> DomainSplit {
        let participants = participants.max(1);
        let mut offset = 0;
        let slices = split_counts(domain.step_count(), participants)
            .into_iter()
            .map(|steps| {
                let slice = if steps == 0 {
                    let at = if domain.is_empty() { domain.start() } else { domain.abscissa(offset) };
                    Partition::new(at, at, 0)
                } else {
                    domain.slice(offset, steps)
                };
                offset += steps;
                slice
            })
            .collect();

        DomainSplit { slices }
    }

    pub fn participants(&self) -> usize {
        self.slices.len()
    }

    pub fn own(&self) -> &Partition {
        &self.slices[COORDINATOR_RANK]
    }

    /// 所有 slice，含 coordinator 自己的。
    pub fn slices(&self) -> &[Partition] {
        &self.slices
    }

    /// 要派送出去的 worker slice：排除 coordinator 與空 slice。
    pub fn dispatched(&self) -> impl Iterator<Item = (Rank, &Partition)> + '_ {
        self.slices
            .iter()
            .enumerate()
            .skip(1)
            .filter(|(_, slice)| !slice.is_empty())
    }

    /// 收不到 Job 的 worker rank。
    pub fn undispatched(&self) -> impl Iterator<Item = Rank> + '_ {
        self.slices
            .iter()
            .enumerate()
            .skip(1)
            .filter(|(_, slice)| slice.is_empty())
            .map(|(rank, _)| rank)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_counts_with_remainder() {
        assert_eq!(split_counts(10, 4), vec![3, 3, 2, 2]);
        assert_eq!(split_counts(8, 4), vec![2, 2, 2, 2]);
        assert_eq!(split_counts(2, 4), vec![1, 1, 0, 0]);
    }

    #[test]
    fn test_split_tiles_domain() {
        let domain = Partition::new(0.0, 1.0, 10);
        let split = DomainSplit::new(&domain, 4);

        assert_eq!(split.own().start(), 0.0);
        assert_eq!(split.own().step_count(), 3);
        for pair in split.slices().windows(2) {
            assert_eq!(pair[0].end(), pair[1].start());
        }
        let total: usize = split.slices().iter().map(|s| s.step_count()).sum();
        assert_eq!(total, 10);
    }

    #[test]
    fn test_empty_slices_not_dispatched() {
        let domain = Partition::new(0.0, 1.0, 2);
        let split = DomainSplit::new(&domain, 4);

        let dispatched: Vec<Rank> = split.dispatched().map(|(rank, _)| rank).collect();
        assert_eq!(dispatched, vec![1]);
        assert_eq!(split.undispatched().collect::<Vec<_>>(), vec![2, 3]);
    }

    #[test]
    fn test_single_participant_keeps_everything() {
        let domain = Partition::new(-2.0, 2.0, 7);
        let split = DomainSplit::new(&domain, 1);

        assert_eq!(split.participants(), 1);
        assert_eq!(split.own().step_count(), 7);
        assert_eq!(split.dispatched().count(), 0);
    }
}
