fn main() -> std::process::ExitCode {
    waste_sort_lib::run()
}
