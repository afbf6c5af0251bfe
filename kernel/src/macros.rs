/// Print to the kernel console.
#[macro_export]
macro_rules! kprint {
    ($($arg:tt)*) => {
        $crate::print::_print(format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! kprintln {
    () => ($crate::kprint!("\n"));
    ($($arg:tt)*) => ($crate::kprint!("{}\n", format_args!($($arg)*)));
}

/// Report an unrecoverable error on the console and halt this CPU.
#[macro_export]
macro_rules! kpanic {
    ($($arg:tt)*) => {
        $crate::print::_panic(format_args!($($arg)*))
    };
}
