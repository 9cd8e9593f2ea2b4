/// A refinable partition of the integers `0..n` into disjoint sets, as described by Valmari
/// in "Fast brief practical DFA minimization" (2011).
///
/// All elements live in a single backing array in which every set occupies a contiguous
/// range `first[s]..past[s]`. Within such a range, the marked elements of a set always
/// form a prefix of length `marked[s]`, which makes marking an element an O(1) swap. Sets
/// that currently hold at least one marked element are remembered in a worklist, so that
/// [`RefinablePartition::split_sets`] and [`RefinablePartition::discard_unmarked`] only
/// ever visit sets with pending work and run in time linear in the number of marks.
///
/// Elements can also belong to no set at all, this happens once they are removed through
/// [`RefinablePartition::discard_unmarked`].
///
/// Indices are not checked beyond what slice indexing does, so passing an element that
/// is not smaller than [`RefinablePartition::len`] or a set that is not smaller than
/// [`RefinablePartition::set_count`] panics.
#[derive(Debug, Clone)]
pub struct RefinablePartition {
    set_count: usize,
    elements: Vec<usize>,
    location: Vec<usize>,
    set_of: Vec<Option<usize>>,
    first: Vec<usize>,
    past: Vec<usize>,
    marked: Vec<usize>,
    touched: Vec<usize>,
}

impl RefinablePartition {
    /// Creates a partition of `0..element_count` that consists of a single set `0`,
    /// or of no set at all if `element_count` is zero.
    pub fn new(element_count: usize) -> Self {
        // there can never be more (non-empty) sets than elements
        let mut past = vec![0; element_count];
        if element_count > 0 {
            past[0] = element_count;
        }
        Self {
            set_count: usize::from(element_count > 0),
            elements: (0..element_count).collect(),
            location: (0..element_count).collect(),
            set_of: vec![Some(0); element_count],
            first: vec![0; element_count],
            past,
            marked: vec![0; element_count],
            touched: Vec::with_capacity(element_count),
        }
    }

    /// Throws away the current sets and regroups all elements by the value of `key`. Elements
    /// with the same key end up in the same set, and sets are numbered in ascending order of
    /// their key. Within a set, elements are in ascending order. Elements that belonged to
    /// no set are regrouped as well, and pending marks are cleared.
    pub fn partition_by<K, F>(&mut self, mut key: F)
    where
        K: Ord,
        F: FnMut(usize) -> K,
    {
        self.set_count = 0;
        self.touched.clear();
        self.marked.fill(0);

        if self.elements.is_empty() {
            return;
        }

        let mut keyed: Vec<(K, usize)> = (0..self.elements.len()).map(|e| (key(e), e)).collect();
        keyed.sort_by(|(left, _), (right, _)| left.cmp(right));

        let mut start = 0;
        for (i, (current, element)) in keyed.iter().enumerate() {
            if i > 0 && keyed[i - 1].0 != *current {
                self.first[self.set_count] = start;
                self.past[self.set_count] = i;
                self.set_count += 1;
                start = i;
            }
            self.elements[i] = *element;
            self.location[*element] = i;
            self.set_of[*element] = Some(self.set_count);
        }
        self.first[self.set_count] = start;
        self.past[self.set_count] = keyed.len();
        self.set_count += 1;
    }

    /// The number of elements the partition was created for, including elements that no
    /// longer belong to any set.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns true if the partition was created for zero elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// The current number of sets.
    pub fn set_count(&self) -> usize {
        self.set_count
    }

    /// Returns the set that `element` belongs to, or `None` if it has been discarded.
    pub fn set_of(&self, element: usize) -> Option<usize> {
        self.set_of[element]
    }

    /// Returns the elements of `set`, in their current order within the backing array.
    pub fn set(&self, set: usize) -> &[usize] {
        &self.elements[self.first[set]..self.past[set]]
    }

    /// Iterates over all sets in the order of their ids.
    pub fn sets(&self) -> impl Iterator<Item = &[usize]> + '_ {
        (0..self.set_count).map(|set| self.set(set))
    }

    /// Returns an arbitrary element of `set`. As sets are never empty, this always exists.
    pub fn some_element_of(&self, set: usize) -> usize {
        self.elements[self.first[set]]
    }

    /// The number of elements of `set` that are currently marked.
    pub fn marked_count(&self, set: usize) -> usize {
        self.marked[set]
    }

    /// Returns true if some set holds marked elements that have not been processed by
    /// [`Self::split_sets`] or [`Self::discard_unmarked`] yet.
    pub fn has_pending_marks(&self) -> bool {
        !self.touched.is_empty()
    }

    /// Iterates over the elements of `set` that are marked at the moment of the call.
    pub fn marked(&self, set: usize) -> impl Iterator<Item = usize> + '_ {
        let first = self.first[set];
        self.elements[first..first + self.marked[set]].iter().copied()
    }

    /// Returns a cursor over the marked elements of `set` which can also mark further
    /// elements while it is consumed. Elements that get marked in `set` before the cursor
    /// is exhausted are yielded as well, which turns a single pass over the cursor into
    /// a fixpoint computation.
    pub fn marked_mut(&mut self, set: usize) -> MarkedFrontier<'_> {
        MarkedFrontier {
            partition: self,
            set,
            position: 0,
        }
    }

    /// Marks `element`. Marking an element that is already marked or that belongs to no
    /// set has no effect.
    pub fn mark(&mut self, element: usize) {
        let Some(set) = self.set_of[element] else {
            return;
        };
        let i = self.location[element];
        let first_unmarked = self.first[set] + self.marked[set];
        if i < first_unmarked {
            return;
        }

        self.elements.swap(i, first_unmarked);
        self.location[self.elements[i]] = i;
        self.location[element] = first_unmarked;

        if self.marked[set] == 0 {
            self.touched.push(set);
        }
        self.marked[set] += 1;
    }

    /// Splits every touched set into its marked and its unmarked elements. The smaller of
    /// the two parts becomes a new set with the next free id, the larger one keeps the id
    /// of the original set. Sets in which every element is marked stay as they are. All
    /// marks are cleared afterwards. Returns the number of sets that were created.
    pub fn split_sets(&mut self) -> usize {
        let before = self.set_count;
        while let Some(set) = self.touched.pop() {
            let first_unmarked = self.first[set] + self.marked[set];
            if first_unmarked == self.past[set] {
                self.marked[set] = 0;
                continue;
            }

            let created = self.set_count;
            if self.marked[set] <= self.past[set] - first_unmarked {
                self.first[created] = self.first[set];
                self.past[created] = first_unmarked;
                self.first[set] = first_unmarked;
            } else {
                self.past[created] = self.past[set];
                self.first[created] = first_unmarked;
                self.past[set] = first_unmarked;
            }

            for &element in &self.elements[self.first[created]..self.past[created]] {
                self.set_of[element] = Some(created);
            }

            self.marked[set] = 0;
            self.marked[created] = 0;
            self.set_count += 1;
        }
        self.set_count - before
    }

    /// Removes the unmarked elements from every touched set, afterwards they belong to no
    /// set. Sets in which every element is marked stay as they are. All marks are cleared
    /// afterwards. Returns the number of discarded elements.
    ///
    /// Note that a set without any marked element is not touched and thus left intact.
    pub fn discard_unmarked(&mut self) -> usize {
        let mut discarded = 0;
        while let Some(set) = self.touched.pop() {
            let first_unmarked = self.first[set] + self.marked[set];
            let past_unmarked = self.past[set];
            self.past[set] = first_unmarked;

            for &element in &self.elements[first_unmarked..past_unmarked] {
                self.set_of[element] = None;
            }

            discarded += past_unmarked - first_unmarked;
            self.marked[set] = 0;
        }
        discarded
    }
}

/// Cursor over the marked prefix of one set of a [`RefinablePartition`], obtained through
/// [`RefinablePartition::marked_mut`]. The end of the prefix is re-read on every call to
/// `next`, so elements marked through [`MarkedFrontier::mark`] in the meantime are
/// visited as well.
#[derive(Debug)]
pub struct MarkedFrontier<'a> {
    partition: &'a mut RefinablePartition,
    set: usize,
    position: usize,
}

impl MarkedFrontier<'_> {
    /// Marks `element` in the underlying partition, see [`RefinablePartition::mark`].
    pub fn mark(&mut self, element: usize) {
        self.partition.mark(element)
    }
}

impl Iterator for MarkedFrontier<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        if self.position >= self.partition.marked[self.set] {
            return None;
        }
        // marking only ever swaps at or behind the end of the marked prefix, so the
        // elements we already handed out stay where they are
        let element = self.partition.elements[self.partition.first[self.set] + self.position];
        self.position += 1;
        Some(element)
    }
}
