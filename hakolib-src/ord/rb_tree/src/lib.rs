//! A red-black tree keyed by a supplied comparison capability.
//!
//! One engine backs the ordered map, set, and multiset: nodes hold a
//! key, a value (`()` for sets), and red/black structural links. Unique
//! and duplicate-admitting insertion are separate entry points; with
//! duplicates, a new entry joins its equal-key run at the rightmost end,
//! so iteration among equals is insertion order.
//!
//! Parent links are non-owning back-pointers used for in-order stepping;
//! ownership runs strictly root-to-leaf, and every node is released
//! exactly once.

use std::{cmp::Ordering, fmt, iter::FusedIterator, marker::PhantomData, ptr::NonNull};

use compare::{Compare, NaturalOrder};
use container_error::InvalidPosition;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Color {
    Red,
    Black,
}

type Link<K, V> = Option<NonNull<Node<K, V>>>;

struct Node<K, V> {
    parent: Link<K, V>,
    left: Link<K, V>,
    right: Link<K, V>,
    color: Color,
    key: K,
    value: V,
}

impl<K, V> Node<K, V> {
    fn new(key: K, value: V) -> NonNull<Self> {
        let node = Self {
            parent: None,
            left: None,
            right: None,
            color: Color::Red,
            key,
            value,
        };
        NonNull::from(Box::leak(Box::new(node)))
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

// `None` attaches at the root.
type AttachAt<K, V> = Option<(NonNull<Node<K, V>>, Side)>;

unsafe fn is_red<K, V>(link: Link<K, V>) -> bool {
    link.map_or(false, |n| (*n.as_ptr()).color == Color::Red)
}

unsafe fn min_node<K, V>(mut node: NonNull<Node<K, V>>) -> NonNull<Node<K, V>> {
    while let Some(left) = (*node.as_ptr()).left {
        node = left;
    }
    node
}

unsafe fn max_node<K, V>(mut node: NonNull<Node<K, V>>) -> NonNull<Node<K, V>> {
    while let Some(right) = (*node.as_ptr()).right {
        node = right;
    }
    node
}

/// In-order next node, computed from parent links.
unsafe fn successor<K, V>(node: NonNull<Node<K, V>>) -> Link<K, V> {
    if let Some(right) = (*node.as_ptr()).right {
        return Some(min_node(right));
    }
    let mut cur = node;
    let mut parent = (*cur.as_ptr()).parent;
    while let Some(p) = parent {
        if (*p.as_ptr()).right != Some(cur) {
            break;
        }
        cur = p;
        parent = (*p.as_ptr()).parent;
    }
    parent
}

unsafe fn predecessor<K, V>(node: NonNull<Node<K, V>>) -> Link<K, V> {
    if let Some(left) = (*node.as_ptr()).left {
        return Some(max_node(left));
    }
    let mut cur = node;
    let mut parent = (*cur.as_ptr()).parent;
    while let Some(p) = parent {
        if (*p.as_ptr()).left != Some(cur) {
            break;
        }
        cur = p;
        parent = (*p.as_ptr()).parent;
    }
    parent
}

unsafe fn drop_subtree<K, V>(link: Link<K, V>) {
    let Some(node) = link else { return };
    let boxed = Box::from_raw(node.as_ptr());
    drop_subtree(boxed.left);
    drop_subtree(boxed.right);
}

unsafe fn clone_subtree<K: Clone, V: Clone>(
    link: Link<K, V>,
    parent: Link<K, V>,
) -> Link<K, V> {
    let node = link?;
    let new = NonNull::from(Box::leak(Box::new(Node {
        parent,
        left: None,
        right: None,
        color: (*node.as_ptr()).color,
        key: (*node.as_ptr()).key.clone(),
        value: (*node.as_ptr()).value.clone(),
    })));
    (*new.as_ptr()).left = clone_subtree((*node.as_ptr()).left, Some(new));
    (*new.as_ptr()).right = clone_subtree((*node.as_ptr()).right, Some(new));
    Some(new)
}

pub struct RbTree<K, V, C = NaturalOrder> {
    root: Link<K, V>,
    len: usize,
    cmp: C,
    marker: PhantomData<Box<Node<K, V>>>,
}

unsafe impl<K: Send, V: Send, C: Send> Send for RbTree<K, V, C> {}
unsafe impl<K: Sync, V: Sync, C: Sync> Sync for RbTree<K, V, C> {}

impl<K, V> RbTree<K, V> {
    pub fn new() -> Self { Self::with_cmp(NaturalOrder) }
}

impl<K, V, C> RbTree<K, V, C> {
    pub fn with_cmp(cmp: C) -> Self {
        Self { root: None, len: 0, cmp, marker: PhantomData }
    }

    pub fn len(&self) -> usize { self.len }
    pub fn is_empty(&self) -> bool { self.len == 0 }

    pub fn clear(&mut self) {
        unsafe { drop_subtree(self.root.take()) }
        self.len = 0;
    }

    pub fn first(&self) -> Option<(&K, &V)> {
        let node = self.first_node()?;
        Some(unsafe { (&(*node.as_ptr()).key, &(*node.as_ptr()).value) })
    }
    pub fn last(&self) -> Option<(&K, &V)> {
        let node = self.last_node()?;
        Some(unsafe { (&(*node.as_ptr()).key, &(*node.as_ptr()).value) })
    }

    pub fn pop_first(&mut self) -> Option<(K, V)> {
        let node = self.pop_first_node()?;
        Some((node.key, node.value))
    }
    pub fn pop_last(&mut self) -> Option<(K, V)> {
        let node = self.last_node()?;
        let node = unsafe { self.remove_node(node) };
        Some((node.key, node.value))
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            front: self.first_node(),
            back: self.last_node(),
            len: self.len,
            marker: PhantomData,
        }
    }
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            front: self.first_node(),
            back: self.last_node(),
            len: self.len,
            marker: PhantomData,
        }
    }

    pub fn cursor_front(&self) -> Cursor<'_, K, V, C> {
        Cursor { current: self.first_node(), tree: self }
    }
    pub fn cursor_back(&self) -> Cursor<'_, K, V, C> {
        Cursor { current: self.last_node(), tree: self }
    }
    pub fn cursor_front_mut(&mut self) -> CursorMut<'_, K, V, C> {
        CursorMut { current: self.first_node(), tree: self }
    }

    fn first_node(&self) -> Link<K, V> {
        self.root.map(|root| unsafe { min_node(root) })
    }
    fn last_node(&self) -> Link<K, V> {
        self.root.map(|root| unsafe { max_node(root) })
    }

    fn pop_first_node(&mut self) -> Option<Box<Node<K, V>>> {
        let node = self.first_node()?;
        Some(unsafe { self.remove_node(node) })
    }

    unsafe fn rotate_left(&mut self, x: NonNull<Node<K, V>>) {
        let y = (*x.as_ptr()).right.unwrap();
        (*x.as_ptr()).right = (*y.as_ptr()).left;
        if let Some(yl) = (*y.as_ptr()).left {
            (*yl.as_ptr()).parent = Some(x);
        }
        (*y.as_ptr()).parent = (*x.as_ptr()).parent;
        match (*x.as_ptr()).parent {
            None => self.root = Some(y),
            Some(p) => {
                if (*p.as_ptr()).left == Some(x) {
                    (*p.as_ptr()).left = Some(y);
                } else {
                    (*p.as_ptr()).right = Some(y);
                }
            }
        }
        (*y.as_ptr()).left = Some(x);
        (*x.as_ptr()).parent = Some(y);
    }

    unsafe fn rotate_right(&mut self, x: NonNull<Node<K, V>>) {
        let y = (*x.as_ptr()).left.unwrap();
        (*x.as_ptr()).left = (*y.as_ptr()).right;
        if let Some(yr) = (*y.as_ptr()).right {
            (*yr.as_ptr()).parent = Some(x);
        }
        (*y.as_ptr()).parent = (*x.as_ptr()).parent;
        match (*x.as_ptr()).parent {
            None => self.root = Some(y),
            Some(p) => {
                if (*p.as_ptr()).left == Some(x) {
                    (*p.as_ptr()).left = Some(y);
                } else {
                    (*p.as_ptr()).right = Some(y);
                }
            }
        }
        (*y.as_ptr()).right = Some(x);
        (*x.as_ptr()).parent = Some(y);
    }

    /// Links a red free-standing node at `at` and restores the color
    /// invariants.
    ///
    /// # Safety
    /// `at` designates a vacant position found by `locate_*` with no
    /// intervening mutation; `node` belongs to no tree.
    unsafe fn attach(&mut self, node: NonNull<Node<K, V>>, at: AttachAt<K, V>) {
        match at {
            None => {
                (*node.as_ptr()).color = Color::Black;
                self.root = Some(node);
            }
            Some((parent, side)) => {
                (*node.as_ptr()).parent = Some(parent);
                match side {
                    Side::Left => (*parent.as_ptr()).left = Some(node),
                    Side::Right => (*parent.as_ptr()).right = Some(node),
                }
                self.insert_fixup(node);
            }
        }
        self.len += 1;
    }

    unsafe fn insert_fixup(&mut self, mut z: NonNull<Node<K, V>>) {
        while let Some(p) = (*z.as_ptr()).parent {
            if (*p.as_ptr()).color == Color::Black {
                break;
            }
            // a red node is never the root, so the grandparent exists
            let g = (*p.as_ptr()).parent.unwrap();
            if (*g.as_ptr()).left == Some(p) {
                let uncle = (*g.as_ptr()).right;
                if is_red(uncle) {
                    (*p.as_ptr()).color = Color::Black;
                    (*uncle.unwrap().as_ptr()).color = Color::Black;
                    (*g.as_ptr()).color = Color::Red;
                    z = g;
                } else {
                    if (*p.as_ptr()).right == Some(z) {
                        z = p;
                        self.rotate_left(z);
                    }
                    let p = (*z.as_ptr()).parent.unwrap();
                    (*p.as_ptr()).color = Color::Black;
                    (*g.as_ptr()).color = Color::Red;
                    self.rotate_right(g);
                }
            } else {
                let uncle = (*g.as_ptr()).left;
                if is_red(uncle) {
                    (*p.as_ptr()).color = Color::Black;
                    (*uncle.unwrap().as_ptr()).color = Color::Black;
                    (*g.as_ptr()).color = Color::Red;
                    z = g;
                } else {
                    if (*p.as_ptr()).left == Some(z) {
                        z = p;
                        self.rotate_right(z);
                    }
                    let p = (*z.as_ptr()).parent.unwrap();
                    (*p.as_ptr()).color = Color::Black;
                    (*g.as_ptr()).color = Color::Red;
                    self.rotate_left(g);
                }
            }
        }
        (*self.root.unwrap().as_ptr()).color = Color::Black;
    }

    /// Replaces the subtree rooted at `u` by `v` in `u`'s parent.
    unsafe fn transplant(&mut self, u: NonNull<Node<K, V>>, v: Link<K, V>) {
        let parent = (*u.as_ptr()).parent;
        match parent {
            None => self.root = v,
            Some(p) => {
                if (*p.as_ptr()).left == Some(u) {
                    (*p.as_ptr()).left = v;
                } else {
                    (*p.as_ptr()).right = v;
                }
            }
        }
        if let Some(v) = v {
            (*v.as_ptr()).parent = parent;
        }
    }

    /// Unlinks `z`, rebalances, and returns the node's allocation.
    ///
    /// # Safety
    /// `z` belongs to `self`.
    unsafe fn remove_node(&mut self, z: NonNull<Node<K, V>>) -> Box<Node<K, V>> {
        let mut y_color = (*z.as_ptr()).color;
        let x: Link<K, V>;
        let x_parent: Link<K, V>;

        if (*z.as_ptr()).left.is_none() {
            x = (*z.as_ptr()).right;
            x_parent = (*z.as_ptr()).parent;
            self.transplant(z, x);
        } else if (*z.as_ptr()).right.is_none() {
            x = (*z.as_ptr()).left;
            x_parent = (*z.as_ptr()).parent;
            self.transplant(z, x);
        } else {
            // the successor takes over z's position and color
            let y = min_node((*z.as_ptr()).right.unwrap());
            y_color = (*y.as_ptr()).color;
            x = (*y.as_ptr()).right;
            if (*y.as_ptr()).parent == Some(z) {
                x_parent = Some(y);
            } else {
                x_parent = (*y.as_ptr()).parent;
                self.transplant(y, x);
                (*y.as_ptr()).right = (*z.as_ptr()).right;
                (*(*y.as_ptr()).right.unwrap().as_ptr()).parent = Some(y);
            }
            self.transplant(z, Some(y));
            (*y.as_ptr()).left = (*z.as_ptr()).left;
            (*(*y.as_ptr()).left.unwrap().as_ptr()).parent = Some(y);
            (*y.as_ptr()).color = (*z.as_ptr()).color;
        }

        if y_color == Color::Black {
            self.remove_fixup(x, x_parent);
        }
        self.len -= 1;
        Box::from_raw(z.as_ptr())
    }

    unsafe fn remove_fixup(&mut self, mut x: Link<K, V>, mut xp: Link<K, V>) {
        while x != self.root && !is_red(x) {
            let Some(p) = xp else { break };
            if (*p.as_ptr()).left == x {
                // x is doubly black, so its sibling subtree is nonempty
                let mut w = (*p.as_ptr()).right.unwrap();
                if (*w.as_ptr()).color == Color::Red {
                    (*w.as_ptr()).color = Color::Black;
                    (*p.as_ptr()).color = Color::Red;
                    self.rotate_left(p);
                    w = (*p.as_ptr()).right.unwrap();
                }
                if !is_red((*w.as_ptr()).left) && !is_red((*w.as_ptr()).right)
                {
                    (*w.as_ptr()).color = Color::Red;
                    x = Some(p);
                    xp = (*p.as_ptr()).parent;
                } else {
                    if !is_red((*w.as_ptr()).right) {
                        if let Some(wl) = (*w.as_ptr()).left {
                            (*wl.as_ptr()).color = Color::Black;
                        }
                        (*w.as_ptr()).color = Color::Red;
                        self.rotate_right(w);
                        w = (*p.as_ptr()).right.unwrap();
                    }
                    (*w.as_ptr()).color = (*p.as_ptr()).color;
                    (*p.as_ptr()).color = Color::Black;
                    if let Some(wr) = (*w.as_ptr()).right {
                        (*wr.as_ptr()).color = Color::Black;
                    }
                    self.rotate_left(p);
                    x = self.root;
                    xp = None;
                }
            } else {
                let mut w = (*p.as_ptr()).left.unwrap();
                if (*w.as_ptr()).color == Color::Red {
                    (*w.as_ptr()).color = Color::Black;
                    (*p.as_ptr()).color = Color::Red;
                    self.rotate_right(p);
                    w = (*p.as_ptr()).left.unwrap();
                }
                if !is_red((*w.as_ptr()).left) && !is_red((*w.as_ptr()).right)
                {
                    (*w.as_ptr()).color = Color::Red;
                    x = Some(p);
                    xp = (*p.as_ptr()).parent;
                } else {
                    if !is_red((*w.as_ptr()).left) {
                        if let Some(wr) = (*w.as_ptr()).right {
                            (*wr.as_ptr()).color = Color::Black;
                        }
                        (*w.as_ptr()).color = Color::Red;
                        self.rotate_left(w);
                        w = (*p.as_ptr()).left.unwrap();
                    }
                    (*w.as_ptr()).color = (*p.as_ptr()).color;
                    (*p.as_ptr()).color = Color::Black;
                    if let Some(wl) = (*w.as_ptr()).left {
                        (*wl.as_ptr()).color = Color::Black;
                    }
                    self.rotate_right(p);
                    x = self.root;
                    xp = None;
                }
            }
        }
        if let Some(x) = x {
            (*x.as_ptr()).color = Color::Black;
        }
    }
}

impl<K, V, C: Compare<K>> RbTree<K, V, C> {
    fn search(&self, key: &K) -> Link<K, V> {
        let mut cur = self.root;
        while let Some(n) = cur {
            cur = match self.cmp.compare(key, unsafe { &(*n.as_ptr()).key }) {
                Ordering::Less => unsafe { (*n.as_ptr()).left },
                Ordering::Greater => unsafe { (*n.as_ptr()).right },
                Ordering::Equal => return Some(n),
            };
        }
        None
    }

    /// The leftmost node whose key is not less than `key`.
    fn lower_bound_node(&self, key: &K) -> Link<K, V> {
        let mut cur = self.root;
        let mut res = None;
        while let Some(n) = cur {
            cur = if self.cmp.le(key, unsafe { &(*n.as_ptr()).key }) {
                res = Some(n);
                unsafe { (*n.as_ptr()).left }
            } else {
                unsafe { (*n.as_ptr()).right }
            };
        }
        res
    }

    /// The leftmost node whose key is strictly greater than `key`.
    fn upper_bound_node(&self, key: &K) -> Link<K, V> {
        let mut cur = self.root;
        let mut res = None;
        while let Some(n) = cur {
            cur = if self.cmp.lt(key, unsafe { &(*n.as_ptr()).key }) {
                res = Some(n);
                unsafe { (*n.as_ptr()).left }
            } else {
                unsafe { (*n.as_ptr()).right }
            };
        }
        res
    }

    fn leftmost_eq(&self, key: &K) -> Link<K, V> {
        let node = self.lower_bound_node(key)?;
        self.cmp
            .eq(key, unsafe { &(*node.as_ptr()).key })
            .then_some(node)
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        let node = self.search(key)?;
        Some(unsafe { &(*node.as_ptr()).value })
    }
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let node = self.search(key)?;
        Some(unsafe { &mut (*node.as_ptr()).value })
    }
    pub fn contains(&self, key: &K) -> bool { self.search(key).is_some() }

    pub fn count(&self, key: &K) -> usize {
        let mut res = 0;
        let mut cur = self.leftmost_eq(key);
        while let Some(node) = cur {
            if !self.cmp.eq(key, unsafe { &(*node.as_ptr()).key }) {
                break;
            }
            res += 1;
            cur = unsafe { successor(node) };
        }
        res
    }

    /// Inserts if `key` is absent, handing back the stored value; on a
    /// duplicate the tree is unchanged and the rejected pair comes back.
    pub fn insert_unique(
        &mut self,
        key: K,
        value: V,
    ) -> Result<&mut V, (K, V)> {
        match self.locate_unique(&key) {
            Err(_) => Err((key, value)),
            Ok(at) => {
                let node = Node::new(key, value);
                unsafe { self.attach(node, at) }
                Ok(unsafe { &mut (*node.as_ptr()).value })
            }
        }
    }

    /// Always inserts; an equal key joins its run at the rightmost end.
    pub fn insert_multi(&mut self, key: K, value: V) {
        let at = self.locate_multi(&key);
        let node = Node::new(key, value);
        unsafe { self.attach(node, at) }
    }

    /// Removes the leftmost node with an equal key (the oldest of a
    /// duplicate run).
    pub fn remove(&mut self, key: &K) -> Option<(K, V)> {
        let node = self.leftmost_eq(key)?;
        let node = unsafe { self.remove_node(node) };
        Some((node.key, node.value))
    }

    pub fn lower_bound(&self, key: &K) -> Cursor<'_, K, V, C> {
        Cursor { current: self.lower_bound_node(key), tree: self }
    }
    pub fn upper_bound(&self, key: &K) -> Cursor<'_, K, V, C> {
        Cursor { current: self.upper_bound_node(key), tree: self }
    }
    pub fn lower_bound_mut(&mut self, key: &K) -> CursorMut<'_, K, V, C> {
        CursorMut { current: self.lower_bound_node(key), tree: self }
    }
    pub fn upper_bound_mut(&mut self, key: &K) -> CursorMut<'_, K, V, C> {
        CursorMut { current: self.upper_bound_node(key), tree: self }
    }

    /// Splices every node of `other` into `self`; nodes whose key is
    /// already present are left behind in `other`. Keys and values are
    /// never cloned or reallocated.
    pub fn merge_unique(&mut self, other: &mut Self) {
        let mut rejected = Vec::new();
        while let Some(node) = other.pop_first_node() {
            if let Err(node) = self.insert_node_unique(node) {
                rejected.push(node);
            }
        }
        for node in rejected {
            // rejected keys are distinct, so the multi path cannot collide
            other.insert_node_multi(node);
        }
    }

    /// Splices every node of `other` into `self` with no uniqueness
    /// check, leaving `other` empty.
    pub fn merge_multi(&mut self, other: &mut Self) {
        while let Some(node) = other.pop_first_node() {
            self.insert_node_multi(node);
        }
    }

    fn locate_unique(
        &self,
        key: &K,
    ) -> Result<AttachAt<K, V>, NonNull<Node<K, V>>> {
        let mut cur = self.root;
        let mut at = None;
        while let Some(n) = cur {
            cur = match self.cmp.compare(key, unsafe { &(*n.as_ptr()).key }) {
                Ordering::Less => {
                    at = Some((n, Side::Left));
                    unsafe { (*n.as_ptr()).left }
                }
                Ordering::Greater => {
                    at = Some((n, Side::Right));
                    unsafe { (*n.as_ptr()).right }
                }
                Ordering::Equal => return Err(n),
            };
        }
        Ok(at)
    }

    fn locate_multi(&self, key: &K) -> AttachAt<K, V> {
        let mut cur = self.root;
        let mut at = None;
        while let Some(n) = cur {
            cur = if self.cmp.lt(key, unsafe { &(*n.as_ptr()).key }) {
                at = Some((n, Side::Left));
                unsafe { (*n.as_ptr()).left }
            } else {
                at = Some((n, Side::Right));
                unsafe { (*n.as_ptr()).right }
            };
        }
        at
    }

    fn insert_node_unique(
        &mut self,
        mut node: Box<Node<K, V>>,
    ) -> Result<(), Box<Node<K, V>>> {
        match self.locate_unique(&node.key) {
            Err(_) => Err(node),
            Ok(at) => {
                node.parent = None;
                node.left = None;
                node.right = None;
                node.color = Color::Red;
                let ptr = NonNull::from(Box::leak(node));
                unsafe { self.attach(ptr, at) }
                Ok(())
            }
        }
    }

    fn insert_node_multi(&mut self, mut node: Box<Node<K, V>>) {
        let at = self.locate_multi(&node.key);
        node.parent = None;
        node.left = None;
        node.right = None;
        node.color = Color::Red;
        let ptr = NonNull::from(Box::leak(node));
        unsafe { self.attach(ptr, at) }
    }

    /// Walks the whole tree checking the color, ordering, and bookkeeping
    /// invariants; panics on any violation. Meant for tests.
    pub fn assert_invariants(&self) {
        if let Some(root) = self.root {
            unsafe {
                assert_eq!((*root.as_ptr()).color, Color::Black);
                assert!((*root.as_ptr()).parent.is_none());
            }
        }
        unsafe { self.check_subtree(self.root, None) };

        let mut count = 0;
        let mut prev: Option<&K> = None;
        let mut cur = self.first_node();
        while let Some(node) = cur {
            let key = unsafe { &(*node.as_ptr()).key };
            if let Some(prev) = prev {
                assert!(self.cmp.le(prev, key), "in-order keys out of order");
            }
            prev = Some(key);
            count += 1;
            cur = unsafe { successor(node) };
        }
        assert_eq!(count, self.len);
    }

    // black height of the subtree, counting the empty position
    unsafe fn check_subtree(&self, link: Link<K, V>, parent: Link<K, V>) -> usize {
        let Some(node) = link else { return 1 };
        assert_eq!((*node.as_ptr()).parent, parent);
        if (*node.as_ptr()).color == Color::Red {
            assert!(!is_red((*node.as_ptr()).left), "red node with red child");
            assert!(!is_red((*node.as_ptr()).right), "red node with red child");
        }
        let lh = self.check_subtree((*node.as_ptr()).left, Some(node));
        let rh = self.check_subtree((*node.as_ptr()).right, Some(node));
        assert_eq!(lh, rh, "unbalanced black height");
        lh + ((*node.as_ptr()).color == Color::Black) as usize
    }
}

impl<K, V, C> Drop for RbTree<K, V, C> {
    fn drop(&mut self) {
        unsafe { drop_subtree(self.root.take()) }
    }
}

impl<K, V, C: Default> Default for RbTree<K, V, C> {
    fn default() -> Self { Self::with_cmp(C::default()) }
}

impl<K: Clone, V: Clone, C: Clone> Clone for RbTree<K, V, C> {
    fn clone(&self) -> Self {
        Self {
            root: unsafe { clone_subtree(self.root, None) },
            len: self.len,
            cmp: self.cmp.clone(),
            marker: PhantomData,
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for RbTree<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: PartialEq, V: PartialEq, C> PartialEq for RbTree<K, V, C> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}
impl<K: Eq, V: Eq, C> Eq for RbTree<K, V, C> {}

pub struct Iter<'a, K, V> {
    front: Link<K, V>,
    back: Link<K, V>,
    len: usize,
    marker: PhantomData<(&'a K, &'a V)>,
}

unsafe impl<K: Sync, V: Sync> Send for Iter<'_, K, V> {}
unsafe impl<K: Sync, V: Sync> Sync for Iter<'_, K, V> {}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);
    fn next(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        let node = self.front?;
        self.front = unsafe { successor(node) };
        self.len -= 1;
        Some(unsafe { (&(*node.as_ptr()).key, &(*node.as_ptr()).value) })
    }
    fn size_hint(&self) -> (usize, Option<usize>) { (self.len, Some(self.len)) }
}

impl<'a, K, V> DoubleEndedIterator for Iter<'a, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        let node = self.back?;
        self.back = unsafe { predecessor(node) };
        self.len -= 1;
        Some(unsafe { (&(*node.as_ptr()).key, &(*node.as_ptr()).value) })
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self { Self { ..*self } }
}

pub struct IterMut<'a, K, V> {
    front: Link<K, V>,
    back: Link<K, V>,
    len: usize,
    marker: PhantomData<(&'a K, &'a mut V)>,
}

unsafe impl<K: Sync, V: Send> Send for IterMut<'_, K, V> {}
unsafe impl<K: Sync, V: Sync> Sync for IterMut<'_, K, V> {}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);
    fn next(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        let node = self.front?;
        self.front = unsafe { successor(node) };
        self.len -= 1;
        Some(unsafe { (&(*node.as_ptr()).key, &mut (*node.as_ptr()).value) })
    }
    fn size_hint(&self) -> (usize, Option<usize>) { (self.len, Some(self.len)) }
}

impl<'a, K, V> DoubleEndedIterator for IterMut<'a, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        let node = self.back?;
        self.back = unsafe { predecessor(node) };
        self.len -= 1;
        Some(unsafe { (&(*node.as_ptr()).key, &mut (*node.as_ptr()).value) })
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}
impl<K, V> FusedIterator for IterMut<'_, K, V> {}

pub struct IntoIter<K, V, C> {
    tree: RbTree<K, V, C>,
}

impl<K, V, C> Iterator for IntoIter<K, V, C> {
    type Item = (K, V);
    fn next(&mut self) -> Option<(K, V)> { self.tree.pop_first() }
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.tree.len, Some(self.tree.len))
    }
}

impl<K, V, C> DoubleEndedIterator for IntoIter<K, V, C> {
    fn next_back(&mut self) -> Option<(K, V)> { self.tree.pop_last() }
}

impl<K, V, C> ExactSizeIterator for IntoIter<K, V, C> {}
impl<K, V, C> FusedIterator for IntoIter<K, V, C> {}

impl<K, V, C> IntoIterator for RbTree<K, V, C> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V, C>;
    fn into_iter(self) -> IntoIter<K, V, C> { IntoIter { tree: self } }
}

impl<'a, K, V, C> IntoIterator for &'a RbTree<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;
    fn into_iter(self) -> Iter<'a, K, V> { self.iter() }
}

impl<'a, K, V, C> IntoIterator for &'a mut RbTree<K, V, C> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;
    fn into_iter(self) -> IterMut<'a, K, V> { self.iter_mut() }
}

/// A read-only position: a node or the end position.
///
/// Obtained from [`RbTree::lower_bound`]/[`RbTree::upper_bound`], which
/// park at the end on a miss rather than failing.
pub struct Cursor<'a, K, V, C = NaturalOrder> {
    current: Link<K, V>,
    tree: &'a RbTree<K, V, C>,
}

impl<'a, K, V, C> Cursor<'a, K, V, C> {
    /// Steps in key order; from the end position, wraps to the first
    /// node.
    pub fn move_next(&mut self) {
        self.current = match self.current {
            Some(node) => unsafe { successor(node) },
            None => self.tree.first_node(),
        };
    }
    pub fn move_prev(&mut self) {
        self.current = match self.current {
            Some(node) => unsafe { predecessor(node) },
            None => self.tree.last_node(),
        };
    }
    pub fn key_value(&self) -> Result<(&'a K, &'a V), InvalidPosition> {
        match self.current {
            Some(node) => {
                Ok(unsafe { (&(*node.as_ptr()).key, &(*node.as_ptr()).value) })
            }
            None => Err(InvalidPosition),
        }
    }
}

/// An editing position over the tree.
///
/// Insertion elsewhere never disturbs a position; only removing the
/// designated node itself retires it, and `remove_current` hands the
/// cursor to the next node when it does.
pub struct CursorMut<'a, K, V, C = NaturalOrder> {
    current: Link<K, V>,
    tree: &'a mut RbTree<K, V, C>,
}

impl<'a, K, V, C> CursorMut<'a, K, V, C> {
    pub fn move_next(&mut self) {
        self.current = match self.current {
            Some(node) => unsafe { successor(node) },
            None => self.tree.first_node(),
        };
    }
    pub fn move_prev(&mut self) {
        self.current = match self.current {
            Some(node) => unsafe { predecessor(node) },
            None => self.tree.last_node(),
        };
    }

    pub fn key_value(&mut self) -> Result<(&K, &mut V), InvalidPosition> {
        match self.current {
            Some(node) => Ok(unsafe {
                (&(*node.as_ptr()).key, &mut (*node.as_ptr()).value)
            }),
            None => Err(InvalidPosition),
        }
    }

    /// Removes the designated entry and steps to the next node.
    pub fn remove_current(&mut self) -> Result<(K, V), InvalidPosition> {
        let node = self.current.ok_or(InvalidPosition)?;
        self.current = unsafe { successor(node) };
        let node = unsafe { self.tree.remove_node(node) };
        Ok((node.key, node.value))
    }
}
