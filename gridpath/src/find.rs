use std::{
    collections::VecDeque,
    fmt::{Debug, Display},
    ops::{Deref, DerefMut},
};

use log::debug;

use crate::error::{NoPath, NoPathReason};

/// Supertrait that collects all the requirements on the NodeReference values
/// Must be copy, comparable and not references (hence 'static)
pub trait NodeReference: Copy + Eq + Debug + 'static {}

pub trait MapTrait {
    /// The type that can be used to reference nodes in the map
    type Reference: NodeReference;

    /// The type that the map uses for storage
    type Storage<T: Default + Copy + Clone + 'static>: MapStorage<T, Reference = Self::Reference>;

    /// Check if the provided node is inside the map and can be stood on
    fn is_valid(&self, node: Self::Reference) -> bool;

    /// Return an iterator over the neighbors of the provided node that can be moved to.
    /// The order must be the same every time for the same node.
    fn neighbors_of(&self, node: Self::Reference) -> impl Iterator<Item = Self::Reference>;

    /// Create a storage for values of type T
    fn create_storage<T: Default + Copy + Clone + 'static>(&self) -> Self::Storage<T>;
}

pub trait MapStorage<T> {
    type Reference: NodeReference;

    fn get(&self, node: Self::Reference) -> T;
    fn get_mut(&mut self, node: Self::Reference) -> &mut T;
}

#[derive(Clone, Copy, Debug)]
pub struct VisitedItem<R> {
    /// Number of moves needed to reach this node from the start
    pub steps: usize,
    pub from: Option<R>,
}

#[derive(Clone, Copy, Debug)]
pub struct Visited<R>(Option<VisitedItem<R>>);

impl<R> Default for Visited<R> {
    fn default() -> Self {
        Visited(None)
    }
}
impl<R> Deref for Visited<R> {
    type Target = Option<VisitedItem<R>>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
impl<R> DerefMut for Visited<R> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}
impl<R> Display for Visited<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.0 {
            Some(item) => write!(f, "{:03} ", item.steps),
            None => write!(f, "{:>3} ", "."),
        }
    }
}

/// A found path. `path` runs from the goal back to the start, both included.
#[derive(Debug, PartialEq, Clone, Eq)]
pub struct PathResult<R> {
    pub path: Vec<R>,
    pub start: R,
    pub goal: R,
    pub steps: usize,
}

impl<R: Copy> PathResult<R> {
    /// The path in walking order, start first
    pub fn source_to_destination(&self) -> Vec<R> {
        self.path.iter().rev().copied().collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathFinderState<R> {
    Computing,
    NoPathFound(NoPath),
    PathFound(PathResult<R>),
}

impl<R> PathFinderState<R> {
    pub fn is_done(&self) -> bool {
        !matches!(self, PathFinderState::Computing)
    }
}

/// Breadth-first search between two nodes, advanced one dequeue at a time by [`PathFinder::step`]
#[derive(Debug)]
pub struct PathFinder<
    R: NodeReference,
    S: MapStorage<Visited<R>, Reference = R>,
    M: MapTrait<Reference = R, Storage<Visited<R>> = S>,
> {
    start: R,
    goal: R,
    visited: S,
    visit_list: VecDeque<R>,
    state: PathFinderState<R>,
    _map: std::marker::PhantomData<M>,
}

impl<
        R: NodeReference,
        S: MapStorage<Visited<R>, Reference = R>,
        M: MapTrait<Reference = R, Storage<Visited<R>> = S>,
    > PathFinder<R, S, M>
{
    pub fn new(map: &M, start: R, goal: R) -> Self {
        let mut visited: S = map.create_storage::<Visited<R>>();
        let mut visit_list = VecDeque::new();

        let state = if !map.is_valid(start) {
            PathFinderState::NoPathFound(NoPath {
                reason: NoPathReason::SourceInvalid,
            })
        } else if !map.is_valid(goal) {
            PathFinderState::NoPathFound(NoPath {
                reason: NoPathReason::DestinationInvalid,
            })
        } else {
            *visited.get_mut(start) = Visited(Some(VisitedItem {
                steps: 0,
                from: None,
            }));
            visit_list.push_back(start);
            PathFinderState::Computing
        };

        if let PathFinderState::NoPathFound(no_path) = &state {
            debug!("rejecting search {:?} -> {:?}: {:?}", start, goal, no_path.reason);
        }

        Self {
            start,
            goal,
            visited,
            visit_list,
            state,
            _map: std::marker::PhantomData,
        }
    }

    /// Run the search to completion, returning the outcome and the visited bookkeeping
    pub fn finish(mut self, map: &M) -> (Result<PathResult<R>, NoPath>, S) {
        while !self.step(map).is_done() {}

        let result = match self.state {
            PathFinderState::PathFound(result) => Ok(result),
            PathFinderState::NoPathFound(no_path) => Err(no_path),
            PathFinderState::Computing => unreachable!("search loop only exits once done"),
        };

        (result, self.visited)
    }

    pub fn step(&mut self, map: &M) -> &PathFinderState<R> {
        if self.state.is_done() {
            return &self.state;
        }

        let Some(point) = self.visit_list.pop_front() else {
            debug!("no path from {:?} to {:?}", self.start, self.goal);
            self.state = PathFinderState::NoPathFound(NoPath {
                reason: NoPathReason::Unreachable,
            });
            return &self.state;
        };

        let steps = match *self.visited.get(point) {
            Some(item) => item.steps,
            None => panic!("Dequeued a Point that was never discovered"),
        };

        if point == self.goal {
            self.state = PathFinderState::PathFound(PathResult {
                path: self.backtrack(),
                start: self.start,
                goal: self.goal,
                steps,
            });
            debug!("found path from {:?} to {:?} in {} steps", self.start, self.goal, steps);
            return &self.state;
        }

        for next in map.neighbors_of(point) {
            if self.visited.get(next).is_none() {
                *self.visited.get_mut(next) = Visited(Some(VisitedItem {
                    steps: steps + 1,
                    from: Some(point),
                }));
                self.visit_list.push_back(next);
            }
        }

        &self.state
    }

    /// Walk the predecessors from the goal back to the start
    fn backtrack(&self) -> Vec<R> {
        let mut path: Vec<R> = vec![self.goal];
        let mut previous_visit = self.visited.get(self.goal);

        loop {
            previous_visit = match previous_visit {
                Visited(Some(VisitedItem { from: None, .. })) => {
                    // we found the starting point, we are done
                    break;
                }
                Visited(Some(VisitedItem {
                    from: Some(from), ..
                })) => {
                    path.push(from);
                    self.visited.get(from)
                }
                Visited(None) => {
                    panic!("Backtracking lead to a Point that was never visited")
                }
            }
        }

        path
    }

    pub fn state(&self) -> &PathFinderState<R> {
        &self.state
    }

    pub fn get_visited(&self) -> &S {
        &self.visited
    }

    pub fn start(&self) -> R {
        self.start
    }

    pub fn goal(&self) -> R {
        self.goal
    }
}

/// Shortest path from `source` to `dest`, listed from `dest` back to `source`
pub fn find_path<M: MapTrait>(
    map: &M,
    source: M::Reference,
    dest: M::Reference,
) -> Result<PathResult<M::Reference>, NoPath> {
    PathFinder::<M::Reference, M::Storage<Visited<M::Reference>>, M>::new(map, source, dest)
        .finish(map)
        .0
}
