fn main() -> anyhow::Result<()> {
    mytools::cli::commands::run()
}
