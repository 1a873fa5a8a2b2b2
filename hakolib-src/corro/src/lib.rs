use inner::doc_inline_reexport;

doc_inline_reexport! {
    slice_insertion,
    slice_removal,
}
