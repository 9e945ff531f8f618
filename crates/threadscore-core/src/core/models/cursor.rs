/// A forward-only cursor over a fixed-length slice that steps over gap positions.
///
/// Yields `(position, item)` pairs where `position` is the index in the underlying slice,
/// so callers keep the alignment column of every element they visit.
pub struct GapSkippingCursor<'a, T, F>
where
    F: Fn(&T) -> bool,
{
    items: &'a [T],
    position: usize,
    is_gap: F,
}

impl<'a, T, F> GapSkippingCursor<'a, T, F>
where
    F: Fn(&T) -> bool,
{
    pub fn new(items: &'a [T], is_gap: F) -> Self {
        Self {
            items,
            position: 0,
            is_gap,
        }
    }
}

impl<'a, T, F> Iterator for GapSkippingCursor<'a, T, F>
where
    F: Fn(&T) -> bool,
{
    type Item = (usize, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(item) = self.items.get(self.position) {
            let position = self.position;
            self.position += 1;
            if !(self.is_gap)(item) {
                return Some((position, item));
            }
        }
        None
    }
}

/// Walks two cursors in lock-step: each advances past its own gaps independently, and the
/// pair is yielded once both point at a non-gap element. Iteration ends as soon as either
/// side is exhausted.
pub fn lockstep<'a, 'b, T, U, F, G>(
    left: GapSkippingCursor<'a, T, F>,
    right: GapSkippingCursor<'b, U, G>,
) -> impl Iterator<Item = ((usize, &'a T), (usize, &'b U))>
where
    F: Fn(&T) -> bool,
    G: Fn(&U) -> bool,
{
    left.zip(right)
}
