#[cfg(feature = "trace")]
#[macro_export]
macro_rules! lrquad_trace {
    () => {
        print!("\n")
    };
    ($($arg:tt)*) => {{
        println!("[lrquad] {}", format!($($arg)*))
    }}
}

#[cfg(not(feature = "trace"))]
#[macro_export]
macro_rules! lrquad_trace {
    () => {};
    ($($arg:tt)*) => {{}};
}
