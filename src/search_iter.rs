use common_macros::hash_map;
use num::Integer;
use priority_queue::PriorityQueue;
use std::cmp::Ordering;
use std::collections::{HashMap, VecDeque};
use std::fmt::Debug;
use std::hash::Hash;
use std::ops::Add;
use trait_set::trait_set;

trait_set! {
    pub trait SearchNode = Clone + Hash + Eq + Debug;
}

/// Breadth-first expansion from one or more start nodes. Yields nodes in the
/// order they are dequeued.
pub struct BfsIter<T: SearchNode, S: FnMut(&T) -> Vec<T>> {
    queue: VecDeque<(T, usize)>,
    depths: HashMap<T, usize>,
    parents: HashMap<T, Option<T>>,
    successor: S,
}

impl<T: SearchNode, S: FnMut(&T) -> Vec<T>> BfsIter<T, S> {
    pub fn new(start: T, successor: S) -> Self {
        let mut queue = VecDeque::new();
        queue.push_back((start.clone(), 0));
        Self {
            queue,
            depths: hash_map!(start.clone() => 0),
            successor,
            parents: hash_map!(start.clone() => None),
        }
    }

    pub fn path_to(&self, node: &T) -> Option<VecDeque<T>> {
        path_to(node, &self.parents)
    }

    pub fn depth_for(&self, node: &T) -> Option<usize> {
        self.depths.get(node).copied()
    }

    pub fn all_depths(&self) -> HashMap<T, usize> {
        self.depths.clone()
    }
}

impl<T: SearchNode, S: FnMut(&T) -> Vec<T>> Iterator for BfsIter<T, S> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.queue.pop_front().map(|(parent, depth)| {
            for child in (self.successor)(&parent) {
                if !self.depths.contains_key(&child) {
                    self.depths.insert(child.clone(), depth + 1);
                    self.parents.insert(child.clone(), Some(parent.clone()));
                    self.queue.push_back((child, depth + 1));
                }
            }
            parent
        })
    }
}

/// Walks parent links back from `node`; the result starts at the search root.
fn path_to<T: SearchNode>(node: &T, parents: &HashMap<T, Option<T>>) -> Option<VecDeque<T>> {
    let mut result = VecDeque::new();
    let mut current = node;
    result.push_front(current.clone());
    while let Some(parent) = parents.get(current)? {
        result.push_front(parent.clone());
        current = parent;
    }
    Some(result)
}

trait_set! {
    pub trait Estimator =
        Integer + Copy + Clone + Add<Output=Self> + PartialOrd + Ord + Debug + Default
}

/// Queue priority. Lower totals rank higher; equal totals rank by `order`,
/// the sequence number of the push that produced the entry.
#[derive(Copy, Clone, Debug, Default)]
struct TotalEstimate<N: Estimator> {
    from_start: N,
    estimate_to_goal: N,
    order: u64,
}

impl<N: Estimator> TotalEstimate<N> {
    fn next_cost(&self, step_cost: N, estimate_to_goal: N, order: u64) -> Self {
        Self {
            from_start: self.from_start + step_cost,
            estimate_to_goal,
            order,
        }
    }

    fn total(&self) -> N {
        self.from_start + self.estimate_to_goal
    }
}

impl<N: Estimator> Ord for TotalEstimate<N> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .total()
            .cmp(&self.total())
            .then_with(|| other.order.cmp(&self.order))
    }
}

impl<N: Estimator> PartialEq for TotalEstimate<N> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<N: Estimator> Eq for TotalEstimate<N> {}

impl<N: Estimator> PartialOrd for TotalEstimate<N> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Best-first search yielding nodes in expansion order. With a consistent
/// heuristic every yielded node has its final, minimal cost.
pub struct PrioritySearchIter<
    N: Estimator,
    T: SearchNode,
    S: FnMut(&T) -> Vec<(T, N)>,
    H: Fn(&T) -> N,
> {
    queue: PriorityQueue<T, TotalEstimate<N>>,
    costs: HashMap<T, N>,
    parents: HashMap<T, Option<T>>,
    successor: S,
    heuristic: H,
    pushes: u64,
    expanded: usize,
}

impl<N: Estimator, T: SearchNode, S: FnMut(&T) -> Vec<(T, N)>, H: Fn(&T) -> N>
    PrioritySearchIter<N, T, S, H>
{
    pub fn a_star(start: T, successor: S, heuristic: H) -> Self {
        let mut queue = PriorityQueue::new();
        let first = TotalEstimate {
            estimate_to_goal: heuristic(&start),
            ..TotalEstimate::default()
        };
        queue.push(start.clone(), first);
        Self {
            queue,
            costs: hash_map!(start.clone() => N::zero()),
            successor,
            parents: hash_map!(start.clone() => None),
            heuristic,
            pushes: 1,
            expanded: 0,
        }
    }

    pub fn path_to(&self, node: &T) -> Option<VecDeque<T>> {
        path_to(node, &self.parents)
    }

    pub fn cost_for(&self, node: &T) -> Option<N> {
        self.costs.get(node).copied()
    }

    /// Number of nodes yielded so far.
    pub fn expanded(&self) -> usize {
        self.expanded
    }

    fn next_order(&mut self) -> u64 {
        let order = self.pushes;
        self.pushes += 1;
        order
    }
}

impl<N: Estimator, T: SearchNode, S: FnMut(&T) -> Vec<(T, N)>>
    PrioritySearchIter<N, T, S, fn(&T) -> N>
{
    pub fn dijkstra(start: T, successor: S) -> Self {
        Self::a_star(start, successor, |_| N::zero())
    }
}

impl<N: Estimator, T: SearchNode, S: FnMut(&T) -> Vec<(T, N)>, H: Fn(&T) -> N> Iterator
    for PrioritySearchIter<N, T, S, H>
{
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        let (parent, cost) = self.queue.pop()?;
        self.expanded += 1;
        self.costs.insert(parent.clone(), cost.from_start);
        for (child, step_cost) in (self.successor)(&parent) {
            if self.costs.contains_key(&child) {
                continue;
            }
            let estimate = (self.heuristic)(&child);
            let reached = cost.from_start + step_cost;
            let queued = self.queue.get_priority(&child).map(|p| p.from_start);
            match queued {
                Some(queued) if reached >= queued => {}
                Some(_) => {
                    let order = self.next_order();
                    self.parents.insert(child.clone(), Some(parent.clone()));
                    self.queue
                        .change_priority(&child, cost.next_cost(step_cost, estimate, order));
                }
                None => {
                    let order = self.next_order();
                    self.parents.insert(child.clone(), Some(parent.clone()));
                    self.queue.push(child, cost.next_cost(step_cost, estimate, order));
                }
            }
        }
        Some(parent)
    }
}
