use inner::doc_inline_reexport;

doc_inline_reexport! {
    list_stack,
    list_queue,
}
