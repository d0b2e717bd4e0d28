// Example: grouped list with a sticky header.
use listwindow::{EngineOptions, GroupedIndex, WindowEngine};

fn main() {
    let options = EngineOptions::new(30).with_group_counts(Some(vec![12, 40, 3, 25]));
    let mut e = WindowEngine::new(options);
    e.set_viewport_size(300);
    e.set_scroll_offset(900).expect("group counts set the total");

    println!("sticky_header={:?}", e.window().sticky_header);
    e.for_each_item(|item| match item.group {
        Some(GroupedIndex::Header { group }) => println!("{:>4} header {group}", item.index),
        Some(GroupedIndex::Item {
            group,
            index_in_group,
            ..
        }) => println!("{:>4}   item {group}.{index_in_group}", item.index),
        None => {}
    });

    let target = e
        .scroll_to_group(2, Default::default())
        .expect("group counts set the total");
    println!("group 2 starts at offset {}", target.offset);
}
