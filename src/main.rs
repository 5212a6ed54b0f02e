fn main() -> anyhow::Result<()> {
    transcript_navigator::cli::run()
}
