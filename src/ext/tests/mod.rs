//! Ergonomics helper tests

use crate::ext::{run, Emptyable, Indirect, OptionEmptyExt, ScopeFunctions, SliceExt};
use indexmap::IndexMap;
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

#[cfg(test)]
mod scope_tests {
    use super::*;

    #[test]
    fn test_run() {
        assert_eq!(run(|| 6 * 7), 42);
    }

    #[test]
    fn test_let_in() {
        let retval = 21i32.let_in(|x| x.to_string());
        assert_eq!(retval, "21");
    }

    #[test]
    fn test_also() {
        let v = Vec::new().also(|v| {
            v.push(1);
            v.push(2);
        });
        assert_eq!(v, vec![1, 2]);
    }

    #[test]
    fn test_take_if() {
        assert_eq!(4i32.take_if(|x| x % 2 == 0), Some(4));
        assert_eq!(3i32.take_if(|x| x % 2 == 0), None);
    }

    #[test]
    fn test_take_unless() {
        assert_eq!(4i32.take_unless(|x| x % 2 == 0), None);
        assert_eq!(3i32.take_unless(|x| x % 2 == 0), Some(3));
    }
}

#[cfg(test)]
mod empty_tests {
    use super::*;

    #[test]
    fn test_is_not_empty() {
        assert!(String::from("a").is_not_empty());
        assert!(!String::new().is_not_empty());
        assert!(vec![1].is_not_empty());
        assert!(!VecDeque::<u8>::new().is_not_empty());
        assert!(!HashMap::<u8, u8>::new().is_not_empty());
        assert!(!HashSet::<u8>::new().is_not_empty());
        assert!(!BTreeSet::<u8>::new().is_not_empty());
        assert!(!IndexMap::<u8, u8>::new().is_not_empty());
        assert!("x".is_not_empty());
        assert!(!(&[] as &[u8]).is_not_empty());
    }

    #[test]
    fn test_none_if_empty() {
        assert_eq!(String::new().none_if_empty(), None);
        assert_eq!(String::from("a").none_if_empty(), Some(String::from("a")));
        assert_eq!(Vec::<u8>::new().none_if_empty(), None);
        assert_eq!("".none_if_empty(), None);
    }

    #[test]
    fn test_option_empty() {
        let none: Option<String> = None;
        assert!(none.is_empty_or_none());
        assert!(Some(String::new()).is_empty_or_none());
        assert!(!Some(String::from("a")).is_empty_or_none());
        assert!(Some(vec![1]).is_not_empty_or_none());
        assert!(!Option::<Vec<u8>>::None.is_not_empty_or_none());
    }

    #[test]
    fn test_value_or_empty() {
        let none: Option<String> = None;
        assert_eq!(none.value_or_empty(), "");
        assert_eq!(Some(vec![1, 2]).value_or_empty(), vec![1, 2]);
        assert!(Option::<HashMap<u8, u8>>::None.value_or_empty().is_empty());
    }
}

#[cfg(test)]
mod slice_tests {
    use super::*;

    #[test]
    fn test_middle_index() {
        let v = [1, 2, 3, 4, 5];
        assert_eq!(v.subslice_with_middle_index(1, 2), &[1, 2, 3, 4]);
        assert_eq!(v.subslice_with_middle_index(2, 1), &[2, 3, 4]);
        assert_eq!(v.subslice_with_middle_index(4, 10), &[1, 2, 3, 4, 5]);
        assert_eq!(v.subslice_with_middle_index(0, 0), &[1]);
    }

    #[test]
    fn test_middle_index_out_of_bounds() {
        let v = [1, 2, 3];
        assert!(v.subslice_with_middle_index(3, 1).is_empty());
        assert!(Vec::<u8>::new().subslice_with_middle_index(0, 1).is_empty());
    }

    #[test]
    fn test_middle_index_large_length() {
        let v = [1, 2, 3];
        assert_eq!(v.subslice_with_middle_index(1, usize::MAX), &[1, 2, 3]);
    }

    #[test]
    fn test_middle_element() {
        let v = ["one", "two", "three", "four", "five"];
        assert_eq!(
            v.subslice_with_middle_element(&"two", 2),
            &["one", "two", "three", "four"]
        );
        assert!(v.subslice_with_middle_element(&"six", 2).is_empty());
    }
}

#[cfg(test)]
mod indirect_tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    fn hash_of<T: Hash>(value: &T) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_equality_and_hash_by_value() {
        let a = Indirect::new(5);
        let b = Indirect::new(5);
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
        assert_ne!(a, Indirect::new(6));
    }

    #[test]
    fn test_set_does_not_affect_clones() {
        let mut a = Indirect::new(String::from("left"));
        let b = a.clone();
        a.set(String::from("right"));
        assert_eq!(a.get(), "right");
        assert_eq!(b.get(), "left");
    }

    #[test]
    fn test_get_mut_copies_on_write() {
        let mut a = Indirect::new(vec![1]);
        let b = a.clone();
        assert!(!a.is_unique());
        a.get_mut().push(2);
        assert!(a.is_unique());
        assert_eq!(*a, vec![1, 2]);
        assert_eq!(*b, vec![1]);
    }

    #[test]
    fn test_recursive_value_type() {
        #[derive(Clone, Debug, PartialEq, Eq, Hash)]
        struct Node {
            id: u32,
            left: Option<Indirect<Node>>,
        }

        let leaf = Node { id: 2, left: None };
        let root = Node {
            id: 1,
            left: Some(Indirect::from(leaf.clone())),
        };
        assert_eq!(root.left.clone().map(Indirect::into_inner), Some(leaf));
    }
}
