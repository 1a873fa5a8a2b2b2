use inner::doc_inline_reexport;

doc_inline_reexport! {
    compare,
    container_error,
}
