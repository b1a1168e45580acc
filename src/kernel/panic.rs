/// Upon panics, print the location of the panic and any associated message,
/// then reset through the fatal path
#[panic_handler]
fn panic(info: &core::panic::PanicInfo) -> ! {
    let (file, line, column) = match info.location() {
        Some(loc) => (loc.file(), loc.line(), loc.column()),
        _ => ("Unknown file", 0, 0),
    };

    super::fatal::fail_fatal(format_args!(
        "PANIC at {}:{}:{}\n{}\n",
        file,
        line,
        column,
        info.message(),
    ))
}
