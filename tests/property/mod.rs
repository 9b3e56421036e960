// Property-based tests harness
mod arithmetic {
    include!("arithmetic.rs");
}
mod reader {
    include!("reader.rs");
}
mod buffers {
    include!("buffers.rs");
}
