//! Test-side readers for the on-disk repository format

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

/// Read and decompress a stored object, splitting off its header
///
/// # Returns
///
/// The object kind ("blob", "tree" or "commit") and the raw body bytes
pub fn read_object(repo_dir: &Path, oid: &str) -> (String, Vec<u8>) {
    let raw = std::fs::read(repo_dir.join(".gitlet").join("objects").join(oid))
        .unwrap_or_else(|e| panic!("Failed to read object {}: {}", oid, e));

    let mut decoder = flate2::read::ZlibDecoder::new(&raw[..]);
    let mut content = Vec::new();
    decoder
        .read_to_end(&mut content)
        .expect("Failed to decompress object");

    let nul = content
        .iter()
        .position(|byte| *byte == 0)
        .expect("Object is missing its header");
    let header = String::from_utf8_lossy(&content[..nul]).to_string();
    let kind = header
        .split(' ')
        .next()
        .expect("Object header has no type")
        .to_string();

    (kind, content[nul + 1..].to_vec())
}

/// Read a ref file under `.gitlet/`, trimmed
pub fn read_ref(repo_dir: &Path, name: &str) -> String {
    std::fs::read_to_string(repo_dir.join(".gitlet").join(name))
        .unwrap_or_else(|e| panic!("Failed to read ref {}: {}", name, e))
        .trim()
        .to_string()
}

pub fn ref_exists(repo_dir: &Path, name: &str) -> bool {
    repo_dir.join(".gitlet").join(name).exists()
}

/// Resolve HEAD to a commit hash, following one symbolic hop
pub fn head_commit(repo_dir: &Path) -> String {
    let head = read_ref(repo_dir, "HEAD");
    match head.strip_prefix("ref: ") {
        Some(target) => read_ref(repo_dir, target),
        None => head,
    }
}

/// The named header fields of a commit body ("tree", "parent", ...)
pub fn commit_fields(repo_dir: &Path, commit_oid: &str, field: &str) -> Vec<String> {
    let (kind, body) = read_object(repo_dir, commit_oid);
    assert_eq!(kind, "commit", "{} is not a commit", commit_oid);

    String::from_utf8_lossy(&body)
        .lines()
        .take_while(|line| !line.is_empty())
        .filter_map(|line| line.strip_prefix(&format!("{} ", field)))
        .map(|value| value.to_string())
        .collect()
}

pub fn commit_tree(repo_dir: &Path, commit_oid: &str) -> String {
    commit_fields(repo_dir, commit_oid, "tree")
        .pop()
        .expect("Commit has no tree")
}

pub fn commit_parents(repo_dir: &Path, commit_oid: &str) -> Vec<String> {
    commit_fields(repo_dir, commit_oid, "parent")
}

/// Flatten a commit's tree into a `path -> blob hash` table
pub fn commit_toc(repo_dir: &Path, commit_oid: &str) -> BTreeMap<String, String> {
    let mut toc = BTreeMap::new();
    flatten_tree(repo_dir, &commit_tree(repo_dir, commit_oid), "", &mut toc);
    toc
}

fn flatten_tree(repo_dir: &Path, tree_oid: &str, prefix: &str, toc: &mut BTreeMap<String, String>) {
    let (kind, body) = read_object(repo_dir, tree_oid);
    assert_eq!(kind, "tree", "{} is not a tree", tree_oid);

    for line in String::from_utf8_lossy(&body).lines() {
        let (tag, rest) = line.split_once(' ').expect("Malformed tree entry");
        let (hash, name) = rest.split_at(40);
        let name = name.trim_start_matches(' ');
        let full_path = if prefix.is_empty() {
            name.to_string()
        } else {
            format!("{}/{}", prefix, name)
        };

        match tag {
            "blob" => {
                toc.insert(full_path, hash.to_string());
            }
            "tree" => flatten_tree(repo_dir, hash, &full_path, toc),
            _ => panic!("Unknown tree entry tag: {}", tag),
        }
    }
}

/// Content of the blob a committed path points at
pub fn committed_file_content(repo_dir: &Path, commit_oid: &str, path: &str) -> String {
    let toc = commit_toc(repo_dir, commit_oid);
    let blob_oid = toc
        .get(path)
        .unwrap_or_else(|| panic!("{} is not in commit {}", path, commit_oid));
    let (kind, body) = read_object(repo_dir, blob_oid);
    assert_eq!(kind, "blob", "{} is not a blob", blob_oid);
    String::from_utf8_lossy(&body).to_string()
}

/// Raw index lines, as stored on disk
pub fn index_lines(repo_dir: &Path) -> Vec<String> {
    std::fs::read_to_string(repo_dir.join(".gitlet").join("index"))
        .unwrap_or_default()
        .lines()
        .map(|line| line.to_string())
        .collect()
}
