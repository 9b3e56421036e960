// Integration tests harness
mod arithmetic {
    include!("arithmetic.rs");
}
mod control {
    include!("control.rs");
}
mod binding {
    include!("binding.rs");
}
mod functions {
    include!("functions.rs");
}
mod data {
    include!("data.rs");
}
mod buffers {
    include!("buffers.rs");
}
mod meta {
    include!("meta.rs");
}
mod errors {
    include!("errors.rs");
}
mod context_depth {
    include!("context_depth.rs");
}
mod device {
    include!("device.rs");
}
