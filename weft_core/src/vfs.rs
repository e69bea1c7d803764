use std::path::Path;
use std::path::PathBuf;

use ignore::gitignore::Gitignore;
use ignore::gitignore::GitignoreBuilder;

use crate::WeftError;
use crate::WeftResult;

/// One file loaded into memory: its absolute path, its path relative to the
/// tree root, and its current text.
#[derive(Debug, Clone)]
pub struct VirtualAsset {
	path: PathBuf,
	rel_path: PathBuf,
	text: String,
	locked: bool,
}

impl VirtualAsset {
	/// Load the file at `path`, recording its location relative to `root`.
	pub fn read(root: &Path, path: impl AsRef<Path>) -> WeftResult<Self> {
		let path = path.as_ref().to_path_buf();
		let rel_path = path.strip_prefix(root).unwrap_or(&path).to_path_buf();
		let text = std::fs::read_to_string(&path)?;
		Ok(Self {
			path,
			rel_path,
			text,
			locked: false,
		})
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	pub fn rel_path(&self) -> &Path {
		&self.rel_path
	}

	pub fn dirname(&self) -> &Path {
		self.rel_path.parent().unwrap_or(Path::new(""))
	}

	pub fn file_name(&self) -> Option<&str> {
		self.path.file_name().and_then(|name| name.to_str())
	}

	pub fn file_stem(&self) -> Option<&str> {
		self.path.file_stem().and_then(|stem| stem.to_str())
	}

	pub fn extension(&self) -> Option<&str> {
		self.path.extension().and_then(|ext| ext.to_str())
	}

	pub fn text(&self) -> &str {
		&self.text
	}

	pub fn is_locked(&self) -> bool {
		self.locked
	}

	/// Prevent any further mutation of this asset's text.
	pub fn lock(&mut self) {
		self.locked = true;
	}

	/// Replace the asset's text.
	pub fn overwrite(&mut self, text: impl Into<String>) -> WeftResult<()> {
		self.ensure_unlocked()?;
		self.text = text.into();
		Ok(())
	}

	pub fn append_text(&mut self, text: &str) -> WeftResult<()> {
		self.ensure_unlocked()?;
		self.text.push_str(text);
		Ok(())
	}

	pub fn prepend_text(&mut self, text: &str) -> WeftResult<()> {
		self.ensure_unlocked()?;
		self.text.insert_str(0, text);
		Ok(())
	}

	/// Flush the in-memory text back to disk at the asset's own path.
	pub fn save(&self) -> WeftResult<()> {
		self.ensure_unlocked()?;
		std::fs::write(&self.path, &self.text)?;
		Ok(())
	}

	fn ensure_unlocked(&self) -> WeftResult<()> {
		if self.locked {
			return Err(WeftError::LockedAsset {
				path: self.path.display().to_string(),
			});
		}
		Ok(())
	}
}

/// An in-memory snapshot of one directory tree, filtered by file extension.
///
/// Assets are collected recursively in sorted path order. Hidden entries and
/// anything matched by the root's `.gitignore` are skipped. A locked tree is
/// a read-only snapshot: [`Vfs::sync`] refuses to write it back.
#[derive(Debug, Clone)]
pub struct Vfs {
	root: PathBuf,
	assets: Vec<VirtualAsset>,
	locked: bool,
}

impl Vfs {
	/// Load every `extension` file under `root` into memory.
	pub fn read(root: impl AsRef<Path>, extension: &str) -> WeftResult<Self> {
		let root = root.as_ref().to_path_buf();
		let gitignore = build_gitignore(&root);
		let mut paths = Vec::new();
		walk_dir(&root, &gitignore, extension, &mut paths)?;
		paths.sort();

		let mut assets = Vec::with_capacity(paths.len());
		for path in paths {
			assets.push(VirtualAsset::read(&root, path)?);
		}
		tracing::debug!(
			root = %root.display(),
			extension,
			count = assets.len(),
			"loaded virtual tree"
		);
		Ok(Self {
			root,
			assets,
			locked: false,
		})
	}

	/// Load a tree and immediately lock it and all of its assets.
	pub fn read_locked(root: impl AsRef<Path>, extension: &str) -> WeftResult<Self> {
		let mut vfs = Self::read(root, extension)?;
		vfs.lock();
		Ok(vfs)
	}

	pub fn root(&self) -> &Path {
		&self.root
	}

	pub fn assets(&self) -> &[VirtualAsset] {
		&self.assets
	}

	pub fn assets_mut(&mut self) -> &mut [VirtualAsset] {
		&mut self.assets
	}

	pub fn len(&self) -> usize {
		self.assets.len()
	}

	pub fn is_empty(&self) -> bool {
		self.assets.is_empty()
	}

	pub fn is_locked(&self) -> bool {
		self.locked
	}

	pub fn iter(&self) -> impl Iterator<Item = &VirtualAsset> {
		self.assets.iter()
	}

	/// Look up an asset by its path relative to the tree root.
	pub fn get(&self, rel_path: impl AsRef<Path>) -> Option<&VirtualAsset> {
		let rel_path = rel_path.as_ref();
		self.assets.iter().find(|asset| asset.rel_path() == rel_path)
	}

	/// Lock the tree and every asset in it.
	pub fn lock(&mut self) {
		self.locked = true;
		for asset in &mut self.assets {
			asset.lock();
		}
	}

	/// Write every asset's in-memory text back to disk.
	pub fn sync(&self) -> WeftResult<()> {
		if self.locked {
			return Err(WeftError::LockedVfs {
				path: self.root.display().to_string(),
			});
		}
		for asset in &self.assets {
			asset.save()?;
		}
		Ok(())
	}
}

/// Build a `.gitignore` matcher rooted at `root`; a tree without a
/// `.gitignore` gets an empty matcher.
fn build_gitignore(root: &Path) -> Gitignore {
	let mut builder = GitignoreBuilder::new(root);
	let _ = builder.add(root.join(".gitignore"));
	builder.build().unwrap_or_else(|_| Gitignore::empty())
}

fn walk_dir(
	dir: &Path,
	gitignore: &Gitignore,
	extension: &str,
	paths: &mut Vec<PathBuf>,
) -> WeftResult<()> {
	let entries = std::fs::read_dir(dir)?;

	for entry in entries {
		let entry = entry?;
		let path = entry.path();

		// Skip hidden entries.
		if let Some(name) = path.file_name().and_then(|name| name.to_str()) {
			if name.starts_with('.') {
				continue;
			}
		}

		let is_dir = path.is_dir();

		if gitignore.matched(&path, is_dir).is_ignore() {
			continue;
		}

		if is_dir {
			walk_dir(&path, gitignore, extension, paths)?;
		} else if path.extension().and_then(|ext| ext.to_str()) == Some(extension) {
			paths.push(path);
		}
	}

	Ok(())
}

/// Two parallel trees paired by relative directory and file stem: each
/// asset in the primary tree must have a counterpart in the secondary tree
/// at the same relative location with the same stem.
#[derive(Debug, Clone)]
pub struct Mirror {
	primary: Vfs,
	secondary: Vfs,
}

impl Mirror {
	pub fn new(primary: Vfs, secondary: Vfs) -> Self {
		Self { primary, secondary }
	}

	pub fn primary(&self) -> &Vfs {
		&self.primary
	}

	pub fn secondary(&self) -> &Vfs {
		&self.secondary
	}

	/// Pair every primary asset with its secondary counterpart. Fails on
	/// the first primary asset with no counterpart.
	pub fn pairs(&self) -> WeftResult<Vec<(&VirtualAsset, &VirtualAsset)>> {
		let mut pairs = Vec::with_capacity(self.primary.len());
		for asset in self.primary.iter() {
			let counterpart = self
				.secondary
				.iter()
				.find(|candidate| {
					candidate.dirname() == asset.dirname()
						&& candidate.file_stem() == asset.file_stem()
				})
				.ok_or_else(|| WeftError::MissingMirrorAsset {
					path: asset.rel_path().display().to_string(),
				})?;
			pairs.push((asset, counterpart));
		}
		Ok(pairs)
	}
}
