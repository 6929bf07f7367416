fn main() {
    forma::cli::run();
}
