fn main() -> Result<(), Box<dyn std::error::Error>> {
    classvfs_cli::run()
}
