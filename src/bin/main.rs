use avl_engine::AvlTree;

fn main() {
    let mut tree: AvlTree<i64> = AvlTree::new();

    for key in [3, 4, 5, 6] {
        tree.insert(key);
        tree.assert_invariants();
    }

    println!("{}", tree.serialize());

    tree.erase(&6);
    tree.assert_invariants();

    println!("{}", tree.serialize());

    let mut dot = String::new();
    tree.dotgraph("demo", &mut dot).unwrap();
    eprintln!("{dot}");
}
