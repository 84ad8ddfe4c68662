use blockfall_engine::{PieceKind, PieceSeed, Randomizer};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PreviewBagArg {
    /// Piece seed as 32 hex digits
    seed: PieceSeed,
    /// Number of bags to print
    #[clap(long, default_value_t = 4)]
    bags: usize,
}

fn format_bag(bag: &[PieceKind]) -> String {
    bag.iter().map(|kind| kind.as_char()).collect()
}

pub(crate) fn run(arg: &PreviewBagArg) -> anyhow::Result<()> {
    let PreviewBagArg { seed, bags } = arg;

    let mut randomizer = Randomizer::with_seed(*seed);
    for _ in 0..*bags {
        let bag: Vec<_> = (0..PieceKind::LEN).map(|_| randomizer.pop_next()).collect();
        println!("{}", format_bag(&bag));
    }
    Ok(())
}
