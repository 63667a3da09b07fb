use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        DeintError::config("x")
            .to_string()
            .contains("configuration error:")
    );
    assert!(
        DeintError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        DeintError::resource("x")
            .to_string()
            .contains("resource exhausted:")
    );
    assert!(
        DeintError::backend("x")
            .to_string()
            .contains("backend error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = DeintError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn io_converts_with_question_mark() {
    fn open_missing() -> DeintResult<()> {
        std::fs::File::open("definitely/not/a/real/path.y4m")?;
        Ok(())
    }
    assert!(matches!(open_missing(), Err(DeintError::Io(_))));
}
