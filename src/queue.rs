use crate::{
    node::{self, Link, Node},
    sort::{self, Run},
    Error,
};
use std::{fmt, marker::PhantomData};

/// A singly-linked queue of owned text values.
///
/// Every inserted value is copied into a buffer owned by the queue, so the
/// caller's text is never retained. Values are compared byte-wise when
/// sorting, the way `strcmp` orders C strings.
///
/// The queue keeps a pointer to its last node, so insertion at either end and
/// the size query are all O(1). [`reverse`] and [`sort`] rearrange the existing
/// nodes without allocating.
///
/// [`reverse`]: Queue::reverse
/// [`sort`]: Queue::sort
///
/// # Examples
///
/// ```
/// use textq::Queue;
///
/// let mut queue = Queue::new();
/// queue.insert_tail("a").unwrap();
/// queue.insert_tail("b").unwrap();
/// queue.insert_head("c").unwrap();
/// assert_eq!(queue.len(), 3);
///
/// queue.reverse();
/// queue.sort();
///
/// assert_eq!(queue.remove_head().as_deref(), Some(&b"a"[..]));
/// assert_eq!(queue.remove_head().as_deref(), Some(&b"b"[..]));
/// assert_eq!(queue.remove_head().as_deref(), Some(&b"c"[..]));
/// assert!(queue.is_empty());
/// ```
pub struct Queue {
    head: Link,
    tail: Link,
    size: usize,
    _owns: PhantomData<Box<Node>>,
}

// Every node reachable from `head` is owned by the queue alone.
unsafe impl Send for Queue {}
unsafe impl Sync for Queue {}

impl Default for Queue {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Queue {
    fn drop(&mut self) {
        self.clear();
    }
}

impl fmt::Debug for Queue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        let mut current = self.head;
        while let Some(node) = current {
            let node = unsafe { node.as_ref() };
            list.entry(&String::from_utf8_lossy(&node.value));
            current = node.next;
        }
        list.finish()
    }
}

impl Queue {
    /// Creates an empty queue.
    ///
    /// This does not allocate: nodes are only allocated as values are inserted.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            head: None,
            tail: None,
            size: 0,
            _owns: PhantomData,
        }
    }

    /// Returns the number of values in the queue.
    #[inline]
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns `true` if the queue holds no values.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns the value at the head of the queue.
    pub fn head(&self) -> Option<&[u8]> {
        self.head.map(|node| unsafe { &*node.as_ref().value })
    }

    /// Returns the value at the tail of the queue.
    pub fn tail(&self) -> Option<&[u8]> {
        self.tail.map(|node| unsafe { &*node.as_ref().value })
    }

    /// Copies `text` into a new node and makes it the head of the queue.
    ///
    /// The copy stops at the first NUL byte in `text`, if there is one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AllocationFailure`] if memory for the node or its value
    /// could not be allocated. The queue is left unchanged in that case.
    ///
    /// # Examples
    ///
    /// ```
    /// use textq::Queue;
    ///
    /// let mut queue = Queue::new();
    /// queue.insert_head("world").unwrap();
    /// queue.insert_head("hello").unwrap();
    /// assert_eq!(queue.head(), Some(&b"hello"[..]));
    /// assert_eq!(queue.tail(), Some(&b"world"[..]));
    /// ```
    pub fn insert_head(&mut self, text: impl AsRef<[u8]>) -> Result<(), Error> {
        let node = Node::alloc(text.as_ref())?;

        unsafe { (*node.as_ptr()).next = self.head };
        self.head = Some(node);
        if self.tail.is_none() {
            self.tail = self.head;
        }

        self.size += 1;
        Ok(())
    }

    /// Copies `text` into a new node and makes it the tail of the queue.
    ///
    /// The copy stops at the first NUL byte in `text`, if there is one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AllocationFailure`] if memory for the node or its value
    /// could not be allocated. The queue is left unchanged in that case.
    pub fn insert_tail(&mut self, text: impl AsRef<[u8]>) -> Result<(), Error> {
        let node = Node::alloc(text.as_ref())?;

        match self.tail {
            Some(tail) => unsafe { (*tail.as_ptr()).next = Some(node) },
            None => self.head = Some(node),
        }
        self.tail = Some(node);

        self.size += 1;
        Ok(())
    }

    /// Removes the head of the queue and returns its value.
    ///
    /// Returns `None` if the queue is empty.
    pub fn remove_head(&mut self) -> Option<Box<[u8]>> {
        let node = self.head?;

        unsafe {
            self.head = node.as_ref().next;
            if self.head.is_none() {
                self.tail = None;
            }

            self.size -= 1;
            Some(Node::free(node))
        }
    }

    /// Removes the head of the queue and copies its value into `buf` as a
    /// NUL-terminated string.
    ///
    /// `buf` is zeroed and receives at most `buf.len() - 1` bytes of the value;
    /// longer values are truncated. An empty `buf` receives nothing, but the
    /// head is still removed. Returns the number of value bytes copied.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if the queue is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use textq::Queue;
    ///
    /// let mut queue = Queue::new();
    /// queue.insert_tail("truncated").unwrap();
    ///
    /// let mut buf = [0xffu8; 6];
    /// assert_eq!(queue.remove_head_into(&mut buf), Ok(5));
    /// assert_eq!(&buf, b"trunc\0");
    /// assert!(queue.remove_head_into(&mut buf).is_err());
    /// ```
    pub fn remove_head_into(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        let value = self
            .remove_head()
            .ok_or(Error::InvalidArgument("queue is empty"))?;
        Ok(node::copy_terminated(&value, buf))
    }

    /// Releases every value in the queue, leaving it empty.
    pub fn clear(&mut self) {
        let mut current = self.head.take();
        self.tail = None;
        self.size = 0;

        while let Some(node) = current {
            unsafe {
                current = node.as_ref().next;
                Node::free(node);
            }
        }
    }

    /// Reverses the order of the queue in place.
    ///
    /// No values are allocated, copied or released.
    ///
    /// # Examples
    ///
    /// ```
    /// use textq::Queue;
    ///
    /// let mut queue = Queue::new();
    /// for text in ["c", "a", "b"].iter() {
    ///     queue.insert_tail(text).unwrap();
    /// }
    ///
    /// queue.reverse();
    /// assert_eq!(format!("{:?}", queue), r#"["b", "a", "c"]"#);
    /// ```
    pub fn reverse(&mut self) {
        if self.size < 2 {
            return;
        }

        tracing::trace!(size = self.size, "reversing queue");
        let (head, tail) = unsafe { sort::reverse(self.head) };
        self.head = head;
        self.tail = tail;
    }

    /// Sorts the queue in ascending byte-wise order.
    ///
    /// This is a merge sort over the queue's own nodes: nothing is allocated
    /// and equal values keep their relative order. Queues with fewer than two
    /// values are left alone.
    ///
    /// # Examples
    ///
    /// ```
    /// use textq::Queue;
    ///
    /// let mut queue = Queue::new();
    /// for text in ["b", "a", "C", "c"].iter() {
    ///     queue.insert_tail(text).unwrap();
    /// }
    ///
    /// queue.sort();
    /// assert_eq!(format!("{:?}", queue), r#"["C", "a", "b", "c"]"#);
    /// assert_eq!(queue.tail(), Some(&b"c"[..]));
    /// ```
    pub fn sort(&mut self) {
        if self.size < 2 {
            return;
        }

        tracing::trace!(size = self.size, "sorting queue");
        unsafe {
            self.head = sort::merge_sort(Run {
                head: self.head,
                len: self.size,
            });
            self.tail = sort::last(self.head);
        }
    }
}
