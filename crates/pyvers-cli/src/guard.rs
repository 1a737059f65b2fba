use pyvers_core::{
    Installation, InstallationState, LifecycleError, LinkError, Linker, PreconditionError,
    Version, VersionCatalog,
};

/// Returns `Ok` when `holds`. Otherwise runs `recovery` and fails with the
/// error built by `error`. A failing recovery is logged and does not replace
/// the precondition error.
pub fn guard_precondition<E>(
    holds: bool,
    recovery: impl FnOnce() -> Result<(), LinkError>,
    error: impl FnOnce() -> E,
) -> Result<(), E> {
    if holds {
        return Ok(());
    }

    if let Err(err) = recovery() {
        tracing::warn!("recovery before reporting failed precondition did not finish: {err}");
    }
    Err(error())
}

/// Locates `version` and requires it to be in the `expected` state, running
/// `recovery` against the linker when it is not.
pub fn check_installation<C, L>(
    catalog: &C,
    linker: &mut L,
    version: &Version,
    expected: InstallationState,
    recovery: impl FnOnce(&mut L, &Version) -> Result<(), LinkError>,
) -> Result<Option<Installation>, LifecycleError>
where
    C: VersionCatalog + ?Sized,
    L: Linker + ?Sized,
{
    let installation = catalog.find_installation(version)?;
    let actual = InstallationState::from_present(installation.is_some());
    tracing::debug!(%version, %actual, "checked installation");

    guard_precondition(
        actual == expected,
        || recovery(linker, version),
        || PreconditionError {
            version: version.clone(),
            expected,
            actual,
        },
    )?;
    Ok(installation)
}
