use inner::doc_inline_reexport;

doc_inline_reexport! {
    grow_vec,
    fixed_array,
    linked_list,
}
