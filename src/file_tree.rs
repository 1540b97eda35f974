//! Folder/file tree of a torrent's files
//!
//! Turns the flat file list of one torrent into the rows of a collapsible
//! tree: every directory prefix becomes a folder row carrying a summary of
//! the files below it, files are listed only while their folders are
//! expanded, and the visible rows are ordered with a [`RecordComparator`]
//! by name then index. Also keeps the fast-scroll section index.

use crate::comparator::{RecordComparator, RecordSource};
use crate::sort_spec::{SortKey, SortSpec};
use crate::value::Record;
use std::collections::BTreeMap;

pub const FIELD_NAME: &str = "name";
pub const FIELD_INDEX: &str = "index";
pub const FIELD_LENGTH: &str = "length";
pub const FIELD_BYTES_COMPLETED: &str = "bytesCompleted";
pub const FIELD_WANTED: &str = "wanted";
pub const FIELD_PRIORITY: &str = "priority";
pub const FIELD_SIZE_WANTED: &str = "sizeWanted";
pub const FIELD_NUM_FILES: &str = "numFiles";
pub const FIELD_NUM_FILES_WANTED: &str = "numFilesWanted";

/// Path segments contributing a letter to a section label
const MAX_SECTION_SEGMENTS: usize = 3;

fn is_separator(c: char) -> bool {
    c == '/' || c == '\\'
}

/// Download priority of a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
}

impl Priority {
    pub fn as_i64(self) -> i64 {
        match self {
            Priority::Low => -1,
            Priority::Normal => 0,
            Priority::High => 1,
        }
    }

    pub fn from_i64(value: i64) -> Self {
        match value {
            v if v < 0 => Priority::Low,
            0 => Priority::Normal,
            _ => Priority::High,
        }
    }
}

/// One file of a torrent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Position of the file in the torrent
    pub index: usize,
    /// Path inside the torrent, `/` or `\` separated
    pub name: String,
    pub length: u64,
    pub bytes_completed: u64,
    pub wanted: bool,
    pub priority: Priority,
}

impl FileEntry {
    pub fn new(index: usize, name: &str, length: u64) -> Self {
        Self {
            index,
            name: name.to_string(),
            length,
            bytes_completed: 0,
            wanted: true,
            priority: Priority::Normal,
        }
    }

    pub fn with_wanted(mut self, wanted: bool) -> Self {
        self.wanted = wanted;
        self
    }

    pub fn with_bytes_completed(mut self, bytes: u64) -> Self {
        self.bytes_completed = bytes;
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Folder prefix including the trailing separator, empty for root files
    pub fn folder(&self) -> &str {
        match self.name.rfind(is_separator) {
            Some(pos) if pos > 0 => &self.name[..=pos],
            _ => "",
        }
    }

    /// File name without its folder
    pub fn short_name(&self) -> &str {
        &self.name[self.folder().len()..]
    }

    pub fn record(&self) -> Record {
        Record::new()
            .with(FIELD_NAME, self.name.as_str())
            .with(FIELD_INDEX, clamp_i64(self.index as u64))
            .with(FIELD_LENGTH, clamp_i64(self.length))
            .with(FIELD_BYTES_COMPLETED, clamp_i64(self.bytes_completed))
            .with(FIELD_WANTED, self.wanted)
            .with(FIELD_PRIORITY, self.priority.as_i64())
    }
}

fn clamp_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Size and count of the files below a folder
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FolderSummary {
    pub size: u64,
    pub size_wanted: u64,
    pub num_files: u64,
    pub num_files_wanted: u64,
}

impl FolderSummary {
    fn add(&mut self, length: u64, wanted: bool) {
        self.size += length;
        self.num_files += 1;
        if wanted {
            self.size_wanted += length;
            self.num_files_wanted += 1;
        }
    }
}

#[derive(Debug, Clone)]
pub struct Folder {
    /// Full path including the trailing separator
    pub path: String,
    /// Last path segment including the trailing separator
    pub name: String,
    /// 0 for top-level folders
    pub level: usize,
    pub parent: Option<String>,
    pub expanded: bool,
    pub summary: FolderSummary,
    record: Record,
}

impl Folder {
    fn new(path: &str, name: &str, level: usize, parent: Option<String>) -> Self {
        let mut folder = Self {
            path: path.to_string(),
            name: name.to_string(),
            level,
            parent,
            expanded: true,
            summary: FolderSummary::default(),
            record: Record::new(),
        };
        folder.refresh_record();
        folder
    }

    fn refresh_record(&mut self) {
        self.record = Record::new()
            .with(FIELD_NAME, self.path.as_str())
            .with(FIELD_LENGTH, clamp_i64(self.summary.size))
            .with(FIELD_SIZE_WANTED, clamp_i64(self.summary.size_wanted))
            .with(FIELD_NUM_FILES, clamp_i64(self.summary.num_files))
            .with(FIELD_NUM_FILES_WANTED, clamp_i64(self.summary.num_files_wanted));
    }

    pub fn record(&self) -> &Record {
        &self.record
    }
}

/// A visible row of the tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeRow {
    /// Folder, by full path
    Folder(String),
    /// File, by position in the file list
    File(usize),
}

/// Outcome of flipping the wanted state of files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WantChange {
    /// Torrent file indexes whose state changed
    pub indexes: Vec<usize>,
    pub wanted: bool,
}

/// Fast-scroll section index over the visible file rows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sections {
    labels: Vec<String>,
    starts: Vec<usize>,
}

impl Sections {
    fn build(rows: &[TreeRow], files: &[FileSlot]) -> Self {
        let mut sections = Sections::default();
        let mut last_prefix = String::from(" ");

        for (position, row) in rows.iter().enumerate() {
            let TreeRow::File(i) = row else {
                continue;
            };
            let Some(slot) = files.get(*i) else {
                continue;
            };
            let name = slot.entry.name.to_uppercase();
            if name.starts_with(&last_prefix) {
                continue;
            }

            let (label, end) = section_label(&name);
            last_prefix = name[..end].to_string();
            sections.labels.push(label);
            sections.starts.push(position);
        }

        sections
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// First row of a section, 0 when out of range
    pub fn position_for_section(&self, section: usize) -> usize {
        self.starts.get(section).copied().unwrap_or(0)
    }

    /// Section containing a row, clamped to the known sections
    pub fn section_for_position(&self, position: usize) -> usize {
        if self.labels.is_empty() {
            return 0;
        }
        let section = match self.starts.binary_search(&position) {
            Ok(i) => i,
            Err(0) => 0,
            Err(i) => i - 1,
        };
        section.min(self.labels.len() - 1)
    }

    pub fn section_name(&self, position: usize) -> &str {
        if self.labels.is_empty() {
            return "";
        }
        &self.labels[self.section_for_position(position)]
    }
}

/// Label joins the first letter of up to three path segments. Also returns
/// the length of the name prefix the label covers, so following rows that
/// share it stay in the same section.
fn section_label(name: &str) -> (String, usize) {
    let segments: Vec<&str> = name.splitn(MAX_SECTION_SEGMENTS + 1, is_separator).collect();
    let mut label = String::new();
    let mut count = 0;
    let mut end = 0;

    for (j, segment) in segments.iter().enumerate() {
        if j > 0 {
            end += 1;
        }
        let Some(first) = segment.chars().next() else {
            continue;
        };
        if !label.is_empty() {
            label.push('/');
        }
        label.push(first);
        count += 1;
        if count >= MAX_SECTION_SEGMENTS || j == segments.len() - 1 {
            end += first.len_utf8();
            break;
        }
        end += segment.len();
    }

    (label, end)
}

#[derive(Debug, Clone)]
struct FileSlot {
    entry: FileEntry,
    record: Record,
}

impl FileSlot {
    fn new(entry: FileEntry) -> Self {
        let record = entry.record();
        Self { entry, record }
    }

    fn set_wanted(&mut self, wanted: bool) {
        self.entry.wanted = wanted;
        self.record.insert(FIELD_WANTED, wanted);
    }
}

/// Borrowed view used as the record source while sorting rows
struct TreeView<'a> {
    files: &'a [FileSlot],
    folders: &'a BTreeMap<String, Folder>,
}

impl RecordSource<TreeRow> for TreeView<'_> {
    fn record_of<'a>(&'a self, item: &'a TreeRow) -> Option<&'a Record> {
        row_record(self.files, self.folders, item)
    }
}

fn row_record<'a>(
    files: &'a [FileSlot],
    folders: &'a BTreeMap<String, Folder>,
    row: &'a TreeRow,
) -> Option<&'a Record> {
    match row {
        TreeRow::File(i) => files.get(*i).map(|slot| &slot.record),
        TreeRow::Folder(path) => folders.get(path).map(Folder::record),
    }
}

/// Collapsible tree over the files of one torrent
#[derive(Debug)]
pub struct FileTree {
    torrent_id: Option<i64>,
    files: Vec<FileSlot>,
    folders: BTreeMap<String, Folder>,
    rows: Vec<TreeRow>,
    total_size_wanted: u64,
    total_files_wanted: u64,
    sections: Sections,
    sorter: RecordComparator,
}

impl Default for FileTree {
    fn default() -> Self {
        Self::new()
    }
}

impl FileTree {
    pub fn new() -> Self {
        let spec = SortSpec::new(vec![
            SortKey::ascending(FIELD_NAME),
            SortKey::ascending(FIELD_INDEX),
        ]);
        Self {
            torrent_id: None,
            files: Vec::new(),
            folders: BTreeMap::new(),
            rows: Vec::new(),
            total_size_wanted: 0,
            total_files_wanted: 0,
            sections: Sections::default(),
            sorter: RecordComparator::with_sort_fields(spec),
        }
    }

    /// Replace the file list. Folder expansion survives a refresh of the
    /// same torrent and is forgotten when the torrent changes.
    pub fn set_files(&mut self, torrent_id: i64, entries: Vec<FileEntry>) {
        if self.torrent_id.is_some_and(|id| id != torrent_id) {
            self.folders.clear();
        }
        self.torrent_id = Some(torrent_id);
        self.files = entries.into_iter().map(FileSlot::new).collect();
        self.rebuild();
    }

    pub fn torrent_id(&self) -> Option<i64> {
        self.torrent_id
    }

    /// Comparator ordering the rows; changes apply on the next rebuild
    pub fn sorter_mut(&mut self) -> &mut RecordComparator {
        &mut self.sorter
    }

    /// Recompute folders, summaries, visible rows, totals and sections
    pub fn rebuild(&mut self) -> &[TreeRow] {
        for folder in self.folders.values_mut() {
            folder.summary = FolderSummary::default();
        }

        let mut rows = Vec::new();
        let mut total_size_wanted = 0;
        let mut total_files_wanted = 0;

        for i in 0..self.files.len() {
            let entry = &self.files[i].entry;
            let folder = entry.folder().to_string();
            let (length, wanted) = (entry.length, entry.wanted);

            if !folder.is_empty() && !self.folders.contains_key(&folder) {
                add_folder_and_parents(&mut self.folders, &folder);
            }

            // Paths that name no folder, such as `a//b`, list at the root
            if !self.folders.contains_key(&folder) {
                rows.push(TreeRow::File(i));
                if wanted {
                    total_size_wanted += length;
                    total_files_wanted += 1;
                }
                continue;
            }
            summarize(&mut self.folders, &folder, length, wanted);

            let expanded = self.folders.get(&folder).map_or(false, |f| f.expanded);
            if expanded && ancestors_expanded(&self.folders, &folder) {
                rows.push(TreeRow::File(i));
            }
        }

        // Folders left over from an earlier file list of the same torrent
        self.folders.retain(|_, folder| folder.summary.num_files > 0);

        for folder in self.folders.values_mut() {
            folder.refresh_record();
            if folder.level == 0 {
                total_size_wanted += folder.summary.size_wanted;
                total_files_wanted += folder.summary.num_files_wanted;
            }
        }
        for (path, _) in self.folders.iter() {
            if ancestors_expanded(&self.folders, path) {
                rows.push(TreeRow::Folder(path.clone()));
            }
        }

        let view = TreeView {
            files: &self.files,
            folders: &self.folders,
        };
        self.sorter.sort(&view, &mut rows);
        self.sections = Sections::build(&rows, &self.files);

        log::debug!(
            "rebuilt file tree: {} files, {} folders, {} rows, {} sections",
            self.files.len(),
            self.folders.len(),
            rows.len(),
            self.sections.len()
        );

        self.rows = rows;
        self.total_size_wanted = total_size_wanted;
        self.total_files_wanted = total_files_wanted;
        &self.rows
    }

    pub fn rows(&self) -> &[TreeRow] {
        &self.rows
    }

    pub fn sections(&self) -> &Sections {
        &self.sections
    }

    pub fn total_size_wanted(&self) -> u64 {
        self.total_size_wanted
    }

    pub fn total_files_wanted(&self) -> u64 {
        self.total_files_wanted
    }

    pub fn folder(&self, path: &str) -> Option<&Folder> {
        self.folders.get(path)
    }

    pub fn folders(&self) -> impl Iterator<Item = &Folder> {
        self.folders.values()
    }

    /// File by torrent file index
    pub fn file(&self, index: usize) -> Option<&FileEntry> {
        self.files
            .iter()
            .map(|slot| &slot.entry)
            .find(|entry| entry.index == index)
    }

    /// Indentation level of a row
    pub fn level(&self, row: &TreeRow) -> usize {
        match row {
            TreeRow::Folder(path) => self.folders.get(path).map_or(0, |f| f.level),
            TreeRow::File(i) => self
                .files
                .get(*i)
                .and_then(|slot| self.folders.get(slot.entry.folder()))
                .map_or(0, |f| f.level + 1),
        }
    }

    /// Short name shown for a row
    pub fn display_name(&self, row: &TreeRow) -> &str {
        match row {
            TreeRow::Folder(path) => self.folders.get(path).map_or("", |f| f.name.as_str()),
            TreeRow::File(i) => self.files.get(*i).map_or("", |slot| slot.entry.short_name()),
        }
    }

    pub fn set_expanded(&mut self, path: &str, expanded: bool) -> bool {
        let Some(folder) = self.folders.get_mut(path) else {
            return false;
        };
        folder.expanded = expanded;
        self.rebuild();
        true
    }

    /// Flip a folder open or closed, returning its new state
    pub fn toggle_expanded(&mut self, path: &str) -> Option<bool> {
        let expanded = !self.folders.get(path)?.expanded;
        self.set_expanded(path, expanded);
        Some(expanded)
    }

    /// Flip the wanted state of one file
    pub fn flip_file_wanted(&mut self, index: usize) -> Option<WantChange> {
        let slot = self.files.iter_mut().find(|slot| slot.entry.index == index)?;
        let wanted = !slot.entry.wanted;
        slot.set_wanted(wanted);
        self.rebuild();
        Some(WantChange {
            indexes: vec![index],
            wanted,
        })
    }

    /// Make every file under `path` wanted if any of them is unwanted,
    /// otherwise make them all unwanted
    pub fn flip_folder_wanted(&mut self, path: &str) -> Option<WantChange> {
        let under: Vec<usize> = self
            .files
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.entry.name.starts_with(path))
            .map(|(i, _)| i)
            .collect();
        if under.is_empty() {
            return None;
        }

        let wanted = under.iter().any(|&i| !self.files[i].entry.wanted);
        let mut indexes = Vec::with_capacity(under.len());
        for i in under {
            let slot = &mut self.files[i];
            slot.set_wanted(wanted);
            indexes.push(slot.entry.index);
        }
        self.rebuild();
        Some(WantChange { indexes, wanted })
    }
}

impl RecordSource<TreeRow> for FileTree {
    fn record_of<'a>(&'a self, item: &'a TreeRow) -> Option<&'a Record> {
        row_record(&self.files, &self.folders, item)
    }
}

fn add_folder_and_parents(folders: &mut BTreeMap<String, Folder>, folder_path: &str) {
    let mut parent: Option<String> = None;
    let mut level = 0;
    let mut start = 0;

    for (pos, ch) in folder_path.char_indices() {
        if !is_separator(ch) {
            continue;
        }
        if pos == start {
            // leading or doubled separator
            start = pos + 1;
            continue;
        }

        let walk = &folder_path[..=pos];
        if !folders.contains_key(walk) {
            let name = &folder_path[start..=pos];
            folders.insert(walk.to_string(), Folder::new(walk, name, level, parent.clone()));
        }
        parent = Some(walk.to_string());
        level += 1;
        start = pos + 1;
    }
}

/// Count a file toward its folder and every ancestor
fn summarize(folders: &mut BTreeMap<String, Folder>, folder_path: &str, length: u64, wanted: bool) {
    let mut current = Some(folder_path.to_string());
    while let Some(path) = current {
        let Some(folder) = folders.get_mut(&path) else {
            break;
        };
        folder.summary.add(length, wanted);
        current = folder.parent.clone();
    }
}

fn ancestors_expanded(folders: &BTreeMap<String, Folder>, folder_path: &str) -> bool {
    let mut parent = folders.get(folder_path).and_then(|f| f.parent.as_deref());
    while let Some(path) = parent {
        match folders.get(path) {
            Some(folder) if folder.expanded => parent = folder.parent.as_deref(),
            Some(_) => return false,
            None => break,
        }
    }
    true
}
