fn main() {
    phpt_convert::cli::run();
}
