use pyvers_core::CatalogBuild;

/// Highest final release among `candidates`, falling back to the highest
/// pre-release when the line has not shipped a final release yet.
pub fn select_best_build(candidates: &[CatalogBuild]) -> Option<&CatalogBuild> {
    candidates
        .iter()
        .filter(|candidate| !candidate.name.is_prerelease())
        .max_by(|a, b| a.name.cmp(&b.name))
        .or_else(|| candidates.iter().max_by(|a, b| a.name.cmp(&b.name)))
}
