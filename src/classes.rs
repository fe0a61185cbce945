//! Closed classes of a Markov chain.
//!
//! State j is reachable from i when some path of positive entries leads from
//! row i to column j. A closed class is a set of states that all reach each
//! other and reach nothing outside the set; once credit enters it, it stays.
//! States outside every closed class are transient and hold no mass in the
//! long run.
//!
//! For a stochastic matrix the number of closed classes equals the
//! multiplicity of eigenvalue 1, so a single class means the stationary
//! distribution is unique.

use std::collections::VecDeque;

use nalgebra::DMatrix;

/// Closed classes and transient states of a chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChainClasses {
    /// Closed classes, each ascending, ordered by their smallest state.
    pub closed: Vec<Vec<usize>>,
    /// States in no closed class, ascending.
    pub transient: Vec<usize>,
}

impl ChainClasses {
    /// Classify the states of the square matrix `m`.
    pub fn of(m: &DMatrix<f64>) -> Self {
        let n = m.nrows();
        let reach: Vec<Vec<bool>> = (0..n).map(|i| reachable_from(m, i)).collect();

        let mut assigned = vec![false; n];
        let mut closed = Vec::new();
        let mut transient = Vec::new();
        for i in 0..n {
            if assigned[i] {
                continue;
            }
            // i is recurrent iff everything it reaches reaches it back
            let recurrent = (0..n).all(|j| !reach[i][j] || reach[j][i]);
            if !recurrent {
                transient.push(i);
                continue;
            }
            let members: Vec<usize> = (0..n).filter(|&j| reach[i][j]).collect();
            for &j in &members {
                assigned[j] = true;
            }
            closed.push(members);
        }
        Self { closed, transient }
    }

    /// Number of closed classes.
    pub fn len(&self) -> usize {
        self.closed.len()
    }

    /// True when there are no states at all.
    pub fn is_empty(&self) -> bool {
        self.closed.is_empty() && self.transient.is_empty()
    }
}

/// BFS over positive entries; `start` reaches itself.
fn reachable_from(m: &DMatrix<f64>, start: usize) -> Vec<bool> {
    let n = m.ncols();
    let mut visited = vec![false; n];
    let mut queue = VecDeque::new();

    visited[start] = true;
    queue.push_back(start);

    while let Some(i) = queue.pop_front() {
        for j in 0..n {
            if m[(i, j)] > 0.0 && !visited[j] {
                visited[j] = true;
                queue.push_back(j);
            }
        }
    }
    visited
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_matrix_is_one_class() {
        let m = DMatrix::from_element(4, 4, 0.25);
        let c = ChainClasses::of(&m);
        assert_eq!(c.closed, vec![vec![0, 1, 2, 3]]);
        assert!(c.transient.is_empty());
    }

    #[test]
    fn islands_are_separate_classes() {
        // {0, 2} swap, {1, 3, 4} cycle
        let m = DMatrix::from_row_slice(
            5,
            5,
            &[
                0.0, 0.0, 1.0, 0.0, 0.0, //
                0.0, 0.0, 0.0, 1.0, 0.0, //
                1.0, 0.0, 0.0, 0.0, 0.0, //
                0.0, 0.0, 0.0, 0.0, 1.0, //
                0.0, 1.0, 0.0, 0.0, 0.0,
            ],
        );
        let c = ChainClasses::of(&m);
        assert_eq!(c.closed, vec![vec![0, 2], vec![1, 3, 4]]);
        assert_eq!(c.len(), 2);
    }

    #[test]
    fn feeder_state_is_transient() {
        // 0 feeds 1; 1 and 2 trade
        let m = DMatrix::from_row_slice(3, 3, &[0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 1.0, 0.0]);
        let c = ChainClasses::of(&m);
        assert_eq!(c.closed, vec![vec![1, 2]]);
        assert_eq!(c.transient, vec![0]);
    }

    #[test]
    fn transient_chain_into_two_classes() {
        // 2 → 3 → {0 | 1}, both absorbing
        let m = DMatrix::from_row_slice(
            4,
            4,
            &[
                1.0, 0.0, 0.0, 0.0, //
                0.0, 1.0, 0.0, 0.0, //
                0.0, 0.0, 0.0, 1.0, //
                0.5, 0.5, 0.0, 0.0,
            ],
        );
        let c = ChainClasses::of(&m);
        assert_eq!(c.closed, vec![vec![0], vec![1]]);
        assert_eq!(c.transient, vec![2, 3]);
    }

    #[test]
    fn empty_matrix_has_no_classes() {
        let c = ChainClasses::of(&DMatrix::<f64>::zeros(0, 0));
        assert!(c.is_empty());
    }
}
