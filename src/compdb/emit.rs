use super::entry::CompileEntry;
use crate::error::{CompdbError, Result};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::fs;
use std::path::Path;

/// Artifact name, always written to the process working directory.
pub const COMPDB_FILE_NAME: &str = "compile_commands.json";

fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b" "));
    value.serialize(&mut ser)?;
    Ok(buf)
}

/// Serialize `entries` as a JSON array indented by one space per level.
pub fn to_json(entries: &[CompileEntry]) -> Result<Vec<u8>> {
    encode(entries)
}

/// Write `parsed` followed by `drivers` to `path`, replacing any existing file.
pub fn write_compdb_to(
    path: &Path,
    parsed: &[CompileEntry],
    drivers: &[CompileEntry],
) -> Result<()> {
    let all: Vec<&CompileEntry> = parsed.iter().chain(drivers).collect();
    let buf = encode(&all)?;
    fs::write(path, buf).map_err(|source| CompdbError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Write the database to `./compile_commands.json`.
pub fn write_compdb(parsed: &[CompileEntry], drivers: &[CompileEntry]) -> Result<()> {
    write_compdb_to(Path::new(COMPDB_FILE_NAME), parsed, drivers)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str) -> CompileEntry {
        CompileEntry {
            directory: "/linux".to_string(),
            command: format!("gcc -c {name}.c"),
            file: format!("{name}.c"),
            output: format!("{name}.o"),
        }
    }

    #[test]
    fn test_one_space_indent_layout() {
        let json = String::from_utf8(to_json(&[entry("foo")]).unwrap()).unwrap();
        let expected = "[\n {\n  \"directory\": \"/linux\",\n  \"command\": \"gcc -c foo.c\",\n  \"file\": \"foo.c\",\n  \"output\": \"foo.o\"\n }\n]";
        assert_eq!(json, expected);
    }

    #[test]
    fn test_empty_database_is_empty_array() {
        assert_eq!(to_json(&[]).unwrap(), b"[]");
    }

    #[test]
    fn test_parsed_entries_precede_driver_entries_and_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(COMPDB_FILE_NAME);
        fs::write(&path, "stale").unwrap();

        write_compdb_to(&path, &[entry("a"), entry("b")], &[entry("drv")]).unwrap();

        let written: Vec<CompileEntry> =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        let outputs: Vec<&str> = written.iter().map(|e| e.output.as_str()).collect();
        assert_eq!(outputs, vec!["a.o", "b.o", "drv.o"]);
    }

    #[test]
    fn test_special_characters_are_escaped() {
        let mut e = entry("mem");
        e.command = r#"gcc -DKBUILD_MODNAME='"mem"' -c mem.c"#.to_string();
        let json = String::from_utf8(to_json(&[e.clone()]).unwrap()).unwrap();
        let back: Vec<CompileEntry> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, vec![e]);
    }
}
