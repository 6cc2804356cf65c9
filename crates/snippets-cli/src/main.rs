fn main() {
    snippets_cli::run_main();
}
