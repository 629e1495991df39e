use crate::models::Vector2D;
use crate::spatial::{NodePool, Region};

#[test]
fn test_region_quadrants() {
    let region = Region::square(-1.0, -1.0, 2.0);
    assert_eq!(region.quadrant(Vector2D::new(-0.5, -0.5)), 0);
    assert_eq!(region.quadrant(Vector2D::new(0.5, -0.5)), 1);
    assert_eq!(region.quadrant(Vector2D::new(-0.5, 0.5)), 2);
    assert_eq!(region.quadrant(Vector2D::new(0.5, 0.5)), 3);
    // Points on a bisector stay on the low side.
    assert_eq!(region.quadrant(Vector2D::new(0.0, 0.0)), 0);
}

#[test]
fn test_region_children_tile_parent() {
    let region = Region::square(0.0, 0.0, 4.0);
    for index in 0..4 {
        let child = region.child(index);
        assert_eq!(child.side(), 2.0);
        assert!(region.contains(child.center()));
        assert_eq!(region.quadrant(child.center()), index);
    }
}

#[test]
fn test_acquire_prefers_free_list() {
    let mut pool = NodePool::with_capacity(2);
    let a = pool.acquire(Region::square(0.0, 0.0, 1.0));
    let b = pool.acquire(Region::square(0.0, 0.0, 1.0));
    assert_ne!(a, b);
    assert_eq!(pool.allocated(), 2);
    assert_eq!(pool.available(), 0);

    // Pool is exhausted, so the arena grows.
    let c = pool.acquire(Region::square(0.0, 0.0, 1.0));
    assert_eq!(pool.allocated(), 3);
    assert_eq!(c.index(), 2);
}

#[test]
fn test_acquire_resets_recycled_node() {
    let mut pool = NodePool::with_capacity(1);
    let root = pool.acquire(Region::square(0.0, 0.0, 1.0));
    {
        let node = pool.get_mut(root);
        node.mass = 5.0;
        node.mass_x = 2.0;
        node.body = Some(3);
    }
    pool.release_tree(root);

    let region = Region::square(10.0, 10.0, 2.0);
    let again = pool.acquire(region);
    assert_eq!(again, root);
    let node = pool.get(again);
    assert_eq!(node.region, region);
    assert_eq!(node.mass, 0.0);
    assert_eq!(node.mass_x, 0.0);
    assert!(node.is_unused());
}

#[test]
fn test_release_tree_returns_every_node() {
    let mut pool = NodePool::with_capacity(0);
    let region = Region::square(0.0, 0.0, 8.0);
    let root = pool.acquire(region);
    let mut parent = root;
    // A chain of depth 5 plus a sibling at every level.
    for _ in 0..5 {
        let child = pool.acquire(region);
        let sibling = pool.acquire(region);
        pool.get_mut(parent).children[0] = Some(child);
        pool.get_mut(parent).children[3] = Some(sibling);
        parent = child;
    }
    assert_eq!(pool.in_use(), 11);
    pool.release_tree(root);
    assert_eq!(pool.in_use(), 0);
    assert_eq!(pool.available(), 11);
}
