use inner::doc_inline_reexport;

doc_inline_reexport! {
    rb_tree,
    ord_map,
    ord_set,
    ord_multiset,
}
