fn main() -> Result<(), Box<dyn std::error::Error>> {
    tagscope_cli::run()
}
