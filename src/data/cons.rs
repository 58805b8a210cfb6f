//! Pair cells.
//!
//! A `Cons` is a head value and a tail. The tail either continues the list
//! with another exclusively-owned cell, ends it (`Tail::Nil`), or holds a
//! final non-list value, making the chain an improper (dotted) list.
//!
//! Chains can be arbitrarily long, so dropping, cloning, comparing and
//! formatting them walk the cells in a loop rather than recursing.

/// Error for appending past a non-list tail.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot append item to improper list or pair whose tail is not nil")]
pub struct ImproperListError;

#[derive(Debug, Clone, PartialEq)]
pub enum Tail<T> {
    /// Proper-list terminator.
    Nil,
    Cons(Box<Cons<T>>),
    /// Terminal value of an improper list.
    Improper(T),
}

pub struct Cons<T> {
    head: T,
    tail: Tail<T>,
}

impl<T> Cons<T> {
    pub fn new(head: T, tail: Tail<T>) -> Self {
        Cons { head, tail }
    }

    /// A single-element proper list.
    pub fn single(head: T) -> Self {
        Cons::new(head, Tail::Nil)
    }

    /// A dotted pair: `(head . tail)`.
    pub fn pair(head: T, tail: T) -> Self {
        Cons::new(head, Tail::Improper(tail))
    }

    /// A proper list of `first` followed by `rest`.
    pub fn of(first: T, rest: impl IntoIterator<Item = T>) -> Self {
        Cons::new(first, link(rest.into_iter().collect(), Tail::Nil))
    }

    /// A proper list of the vector's elements; `None` if it is empty.
    pub fn from_vec(items: Vec<T>) -> Option<Self> {
        let mut items = items.into_iter();
        let first = items.next()?;
        Some(Cons::of(first, items))
    }

    pub fn head(&self) -> &T {
        &self.head
    }

    pub fn tail(&self) -> &Tail<T> {
        &self.tail
    }

    /// The next cell, if the list continues.
    pub fn rest(&self) -> Option<&Cons<T>> {
        match &self.tail {
            Tail::Cons(next) => Some(next),
            _ => None,
        }
    }

    /// Add `value` to the end of a proper list.
    pub fn append(&mut self, value: T) -> Result<&mut Self, ImproperListError> {
        let mut tail = &mut self.tail;
        while let Tail::Cons(next) = tail {
            tail = &mut next.tail;
        }
        if let Tail::Improper(_) = tail {
            return Err(ImproperListError);
        }
        *tail = Tail::Cons(Box::new(Cons::single(value)));
        Ok(self)
    }

    /// False if the chain ends in a non-nil value.
    pub fn is_proper(&self) -> bool {
        let mut cell = self;
        loop {
            match &cell.tail {
                Tail::Nil => return true,
                Tail::Improper(_) => return false,
                Tail::Cons(next) => cell = next,
            }
        }
    }

    /// Number of values iteration yields (an improper tail counts as one).
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn get(&self, n: usize) -> Option<&T> {
        self.iter().nth(n)
    }

    /// Values in order: every head, then the improper tail value if there is one.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            next: Some(Position::Head(self)),
        }
    }

    /// Apply `f` to every value, preserving the list's shape.
    pub fn map<U>(&self, mut f: impl FnMut(&T) -> U) -> Cons<U> {
        let first = f(&self.head);
        let mut rest = Vec::new();
        let mut tail = &self.tail;
        let end = loop {
            match tail {
                Tail::Nil => break Tail::Nil,
                Tail::Improper(value) => break Tail::Improper(f(value)),
                Tail::Cons(next) => {
                    rest.push(f(&next.head));
                    tail = &next.tail;
                }
            }
        };
        Cons::new(first, link(rest, end))
    }
}

/// Chain `items` in front of `end`.
fn link<T>(items: Vec<T>, end: Tail<T>) -> Tail<T> {
    items
        .into_iter()
        .rev()
        .fold(end, |tail, head| Tail::Cons(Box::new(Cons::new(head, tail))))
}

enum Position<'a, T> {
    Head(&'a Cons<T>),
    Improper(&'a T),
}

pub struct Iter<'a, T> {
    next: Option<Position<'a, T>>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next.take()? {
            Position::Head(cell) => {
                self.next = match &cell.tail {
                    Tail::Nil => None,
                    Tail::Cons(next) => Some(Position::Head(next)),
                    Tail::Improper(value) => Some(Position::Improper(value)),
                };
                Some(&cell.head)
            }
            Position::Improper(value) => Some(value),
        }
    }
}

impl<'a, T> IntoIterator for &'a Cons<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> Drop for Cons<T> {
    fn drop(&mut self) {
        let mut tail = std::mem::replace(&mut self.tail, Tail::Nil);
        while let Tail::Cons(mut next) = tail {
            tail = std::mem::replace(&mut next.tail, Tail::Nil);
        }
    }
}

impl<T: Clone> Clone for Cons<T> {
    fn clone(&self) -> Self {
        self.map(T::clone)
    }
}

impl<T: PartialEq> PartialEq for Cons<T> {
    fn eq(&self, other: &Self) -> bool {
        let (mut left, mut right) = (self, other);
        loop {
            if left.head != right.head {
                return false;
            }
            match (&left.tail, &right.tail) {
                (Tail::Nil, Tail::Nil) => return true,
                (Tail::Improper(a), Tail::Improper(b)) => return a == b,
                (Tail::Cons(a), Tail::Cons(b)) => {
                    left = a;
                    right = b;
                }
                _ => return false,
            }
        }
    }
}

/// Formats as `(a b c)`, or `(a b . c)` for an improper list.
impl<T: std::fmt::Debug> std::fmt::Debug for Cons<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:?}", self.head)?;
        let mut tail = &self.tail;
        loop {
            match tail {
                Tail::Nil => break,
                Tail::Improper(value) => {
                    write!(f, " . {:?}", value)?;
                    break;
                }
                Tail::Cons(next) => {
                    write!(f, " {:?}", next.head)?;
                    tail = &next.tail;
                }
            }
        }
        f.write_str(")")
    }
}
