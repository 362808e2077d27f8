/// Fixed-capacity sample history. Once full, each push overwrites the
/// oldest sample in place.
#[derive(Clone, Debug)]
pub struct RingBuffer<T> {
    slots: Vec<T>,
    start: usize,
    cap: usize,
}

impl<T> RingBuffer<T> {
    pub fn new(cap: usize) -> Self {
        Self {
            slots: Vec::with_capacity(cap),
            start: 0,
            cap: cap.max(1),
        }
    }

    pub fn push(&mut self, item: T) {
        if self.slots.len() < self.cap {
            self.slots.push(item);
        } else {
            self.slots[self.start] = item;
            self.start = (self.start + 1) % self.cap;
        }
    }

    /// Iterates oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        let (wrapped, tail) = self.slots.split_at(self.start);
        tail.iter().chain(wrapped.iter())
    }

    pub fn last(&self) -> Option<&T> {
        if self.slots.len() < self.cap {
            self.slots.last()
        } else {
            self.slots.get((self.start + self.cap - 1) % self.cap)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.slots.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overwrites_oldest_at_capacity() {
        let mut rb = RingBuffer::new(3);
        for v in 1..=5 {
            rb.push(v);
        }
        assert_eq!(rb.len(), 3);
        let items: Vec<_> = rb.iter().copied().collect();
        assert_eq!(items, vec![3, 4, 5]);
        assert_eq!(rb.last(), Some(&5));
    }

    #[test]
    fn test_partial_fill_keeps_order() {
        let mut rb = RingBuffer::new(4);
        rb.push(10);
        rb.push(20);
        let items: Vec<_> = rb.iter().copied().collect();
        assert_eq!(items, vec![10, 20]);
        assert_eq!(rb.last(), Some(&20));
    }

    #[test]
    fn test_empty() {
        let rb: RingBuffer<f32> = RingBuffer::new(5);
        assert!(rb.is_empty());
        assert_eq!(rb.iter().count(), 0);
        assert_eq!(rb.last(), None);
    }
}
