use std::cmp::Ordering;

/// Comparison capability over `T`.
///
/// Comparators are instances rather than bare types, so a container can
/// carry state (a closure, a reversed inner comparator) along with the
/// ordering it imposes.
pub trait Compare<T: ?Sized> {
    fn compare(&self, a: &T, b: &T) -> Ordering;

    fn lt(&self, a: &T, b: &T) -> bool { self.compare(a, b) == Ordering::Less }
    fn le(&self, a: &T, b: &T) -> bool {
        self.compare(a, b) != Ordering::Greater
    }
    fn gt(&self, a: &T, b: &T) -> bool {
        self.compare(a, b) == Ordering::Greater
    }
    fn ge(&self, a: &T, b: &T) -> bool { self.compare(a, b) != Ordering::Less }
    fn eq(&self, a: &T, b: &T) -> bool { self.compare(a, b) == Ordering::Equal }
}

/// The ordering of `T: Ord`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NaturalOrder;

impl<T: Ord + ?Sized> Compare<T> for NaturalOrder {
    fn compare(&self, a: &T, b: &T) -> Ordering { a.cmp(b) }
}

/// Flips the verdicts of the inner comparator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Reversed<C>(pub C);

impl<T: ?Sized, C: Compare<T>> Compare<T> for Reversed<C> {
    fn compare(&self, a: &T, b: &T) -> Ordering { self.0.compare(b, a) }
}

impl<T: ?Sized, F: Fn(&T, &T) -> Ordering> Compare<T> for F {
    fn compare(&self, a: &T, b: &T) -> Ordering { self(a, b) }
}

#[macro_export]
macro_rules! def_compare {
    ( $($name:ident[$($gen:tt)*] where [$($where:tt)*] =
        ($ty:ty, $cmp:expr $(,)?)),* $(,)? ) => { $(
        #[derive(Clone, Copy, Debug)]
        struct $name<$($gen)*>(std::marker::PhantomData<fn() -> ($($gen)*)>)
        where $($where)*;
        impl<$($gen)*> $name<$($gen)*>
        where $($where)*
        {
            fn new() -> Self { Self(std::marker::PhantomData) }
        }
        impl<$($gen)*> $crate::Compare<$ty> for $name<$($gen)*>
        where $($where)*
        {
            fn compare(&self, a: &$ty, b: &$ty) -> std::cmp::Ordering {
                ($cmp)(a, b)
            }
        }
        impl<$($gen)*> Default for $name<$($gen)*>
        where $($where)*
        {
            fn default() -> Self { Self::new() }
        }
    )* };
    ( $($name:ident = ($ty:ty, $cmp:expr $(,)?)),* $(,)? ) => { $(
        $crate::def_compare! { $name[] where [] = ($ty, $cmp) }
    )* };
}

#[cfg(test)]
mod tests {
    use std::cmp::Ordering;

    use crate::{Compare, NaturalOrder, Reversed};

    #[test]
    fn natural_order() {
        assert_eq!(NaturalOrder.compare(&1, &2), Ordering::Less);
        assert_eq!(NaturalOrder.compare(&2, &2), Ordering::Equal);
        assert!(NaturalOrder.lt(&1, &2));
        assert!(NaturalOrder.le(&2, &2));
        assert!(NaturalOrder.ge(&2, &2));
        assert!(!NaturalOrder.gt(&2, &2));
        // `PartialEq::eq` is also in scope for the unit struct
        assert!(Compare::eq(&NaturalOrder, &2, &2));
    }

    #[test]
    fn reversed() {
        let rev = Reversed(NaturalOrder);
        assert_eq!(rev.compare(&1, &2), Ordering::Greater);
        assert_eq!(rev.compare(&2, &1), Ordering::Less);
        assert_eq!(Reversed(rev).compare(&1, &2), Ordering::Less);
    }

    #[test]
    fn closures() {
        let by_abs = |a: &i32, b: &i32| a.abs().cmp(&b.abs());
        assert_eq!(by_abs.compare(&-3, &2), Ordering::Greater);
        assert_eq!(by_abs.compare(&-2, &2), Ordering::Equal);
    }

    #[test]
    fn def_compare() {
        def_compare! {
            ByLen = (str, |a: &str, b: &str| a.len().cmp(&b.len())),
        }

        let by_len = ByLen::new();
        assert_eq!(by_len.compare("yes", "no"), Ordering::Greater);
        assert_eq!(by_len.compare("ya", "no"), Ordering::Equal);
    }
}
