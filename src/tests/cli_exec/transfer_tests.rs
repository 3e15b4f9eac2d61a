use super::*;

fn pinned(cid: &str, filename: &str) -> FileEntry {
    FileEntry {
        record_key: Some("rk1".into()),
        filename: Some(filename.into()),
        ..FileEntry::orphan(cid)
    }
}

#[test]
fn download_uses_pinned_filename() {
    let entries = vec![pinned("bafkone", "holiday.jpg")];
    assert_eq!(default_file_name(&entries, "bafkone"), "holiday.jpg");
}

#[test]
fn download_name_never_leaves_the_current_directory() {
    let entries = vec![pinned("bafkone", "../../etc/passwd")];
    assert_eq!(default_file_name(&entries, "bafkone"), "passwd");
}

#[test]
fn orphans_download_under_their_content_id() {
    let entries = vec![FileEntry::orphan("bafktwo")];
    assert_eq!(default_file_name(&entries, "bafktwo"), "bafktwo");
    assert_eq!(default_file_name(&[], "bafkthree"), "bafkthree");
}
