//! The built-in catalog of wrapped libc functions

use crate::annotation::{create_nomap_nolog_version, map, map_at, optional_arg_is_create_mode, pass_va_list};
use crate::catalog::{Catalog, CatalogBuilder, Entry, Result, Target};

const O_CREAT: &str = "flags&O_CREAT";

/// Build the catalog of every function the preload library wraps
///
/// Declarations whose parameters include function pointers carry explicit
/// argument names, since the default heuristic splits inside them.
pub fn builtin_catalog() -> Result<Catalog> {
	let mut c = CatalogBuilder::new();
	register_wraps(&mut c)?;
	register_gates(&mut c)?;
	Ok(c.build())
}

fn register_wraps(c: &mut CatalogBuilder) -> Result<()> {
	c.wrap("char* tmpnam(char *s)", vec![])?;
	c.wrap("char *mktemp (char *template)", vec![])?;
	c.wrap(
		"int __open(const char *pathname, int flags, ...)",
		vec![map("pathname"), optional_arg_is_create_mode(O_CREAT)],
	)?;
	c.wrap(
		"int __open64(const char *pathname, int flags, ...)",
		vec![map("pathname"), optional_arg_is_create_mode(O_CREAT)],
	)?;
	c.wrap(
		"int open(const char *pathname, int flags, ...)",
		vec![
			map("pathname"),
			optional_arg_is_create_mode(O_CREAT),
			create_nomap_nolog_version(),
		],
	)?;
	c.wrap(
		"int open64(const char *pathname, int flags, ...)",
		vec![map("pathname"), optional_arg_is_create_mode(O_CREAT)],
	)?;
	c.wrap(
		"int openat(int dirfd, const char *pathname, int flags, ...)",
		vec![map_at("dirfd", "pathname"), optional_arg_is_create_mode(O_CREAT)],
	)?;
	c.wrap(
		"int openat64(int dirfd, const char *pathname, int flags, ...)",
		vec![map_at("dirfd", "pathname"), optional_arg_is_create_mode(O_CREAT)],
	)?;
	c.wrap(
		"int symlinkat(const char *oldpath, int newdirfd, const char *newpath)",
		vec![map("oldpath"), map_at("newdirfd", "newpath")],
	)?;
	c.wrap(
		"int renameat(int olddirfd, const char *oldpath, int newdirfd, const char *newpath)",
		vec![map_at("olddirfd", "oldpath"), map_at("newdirfd", "newpath")],
	)?;
	c.wrap(
		"int linkat(int olddirfd, const char *oldpath, int newdirfd, const char *newpath, int flags)",
		vec![map_at("olddirfd", "oldpath"), map_at("newdirfd", "newpath")],
	)?;
	c.wrap("int __lxstat(int ver, const char *filename, struct stat *buf)", vec![map("filename")])?;
	c.wrap("int __lxstat64(int ver, const char *filename, struct stat64 *buf)", vec![map("filename")])?;
	c.wrap("DIR *__opendir2(const char *name, int flags)", vec![map("name")])?;
	c.wrap("int __xmknod(int ver, const char *path, mode_t mode, dev_t *dev)", vec![map("path")])?;
	c.wrap("int __xstat(int ver, const char *filename, struct stat *buf)", vec![map("filename")])?;
	c.wrap("int __xstat64(int ver, const char *filename, struct stat64 *buf)", vec![map("filename")])?;
	c.register(
		Target::Wraps,
		Entry::new(
			"int _xftw(int mode, const char *dir, int (*fn)(const char *file, const struct stat *sb, int flag), int nopenfd)",
		)
		.annotate(map("dir"))
		.arg_names(["mode", "dir", "fn", "nopenfd"]),
	)?;
	c.register(
		Target::Wraps,
		Entry::new(
			"int _xftw64(int mode, const char *dir, int (*fn)(const char *file, const struct stat64 *sb, int flag), int nopenfd)",
		)
		.annotate(map("dir"))
		.arg_names(["mode", "dir", "fn", "nopenfd"]),
	)?;
	c.wrap(
		"int access(const char *pathname, int mode)",
		vec![map("pathname"), create_nomap_nolog_version()],
	)?;
	c.wrap("int acct(const char *filename)", vec![map("filename")])?;
	c.wrap("char *canonicalize_file_name(const char *name)", vec![map("name")])?;
	c.wrap("int chdir(const char *path)", vec![map("path")])?;
	c.wrap("int chmod(const char *path, mode_t mode)", vec![map("path")])?;
	c.wrap("int chown(const char *path, uid_t owner, gid_t group)", vec![map("path")])?;
	c.wrap("int creat(const char *pathname, mode_t mode)", vec![map("pathname")])?;
	c.wrap("int creat64(const char *pathname, mode_t mode)", vec![map("pathname")])?;
	c.wrap("void *dlmopen(Lmid_t nsid, const char *filename, int flag)", vec![map("filename")])?;
	c.wrap("void *dlopen(const char *filename, int flag)", vec![map("filename")])?;
	c.wrap("int euidaccess(const char *pathname, int mode)", vec![map("pathname")])?;
	c.wrap(
		"int faccessat(int dirfd, const char *pathname, int mode, int flags)",
		vec![map_at("dirfd", "pathname")],
	)?;
	c.wrap(
		"int fchmodat(int dirfd, const char *pathname, mode_t mode, int flags)",
		vec![map_at("dirfd", "pathname")],
	)?;
	c.wrap(
		"int fchownat(int dirfd, const char *pathname, uid_t owner, gid_t group, int flags)",
		vec![map_at("dirfd", "pathname")],
	)?;
	c.wrap("FILE *fopen(const char *path, const char *mode)", vec![map("path")])?;
	c.wrap("FILE *fopen64(const char *path, const char *mode)", vec![map("path")])?;
	c.wrap("FILE *freopen(const char *path, const char *mode, FILE *stream)", vec![map("path")])?;
	c.wrap("FILE *freopen64(const char *path, const char *mode, FILE *stream)", vec![map("path")])?;
	c.wrap(
		"int fstatat(int dirfd, const char *pathname, struct stat *buf, int flags)",
		vec![map_at("dirfd", "pathname")],
	)?;
	c.register(
		Target::Wraps,
		Entry::new("int ftw(const char *dir, int (*fn)(const char *file, const struct stat *sb, int flag), int nopenfd)")
			.annotate(map("dir"))
			.arg_names(["dir", "fn", "nopenfd"]),
	)?;
	c.register(
		Target::Wraps,
		Entry::new(
			"int ftw64(const char *dir, int (*fn)(const char *file, const struct stat64 *sb, int flag), int nopenfd)",
		)
		.annotate(map("dir"))
		.arg_names(["dir", "fn", "nopenfd"]),
	)?;
	c.wrap(
		"int futimesat(int dirfd, const char *pathname, const struct timeval times[2])",
		vec![map_at("dirfd", "pathname")],
	)?;
	c.wrap(
		"ssize_t getxattr(const char *path, const char *name, void *value, size_t size)",
		vec![map("path")],
	)?;
	c.wrap("int glob_pattern_p(const char *pattern, int quote)", vec![map("pattern")])?;
	c.wrap("int lchmod(const char *path, mode_t mode)", vec![map("path")])?;
	c.wrap("int lchown(const char *path, uid_t owner, gid_t group)", vec![map("path")])?;
	c.wrap(
		"ssize_t lgetxattr(const char *path, const char *name, void *value, size_t size)",
		vec![map("path")],
	)?;
	c.wrap("int link(const char *oldpath, const char *newpath)", vec![map("oldpath"), map("newpath")])?;
	c.wrap("ssize_t listxattr(const char *path, char *list, size_t size)", vec![map("path")])?;
	c.wrap("ssize_t llistxattr(const char *path, char *list, size_t size)", vec![map("path")])?;
	c.wrap("int lremovexattr(const char *path, const char *name)", vec![map("path")])?;
	c.wrap(
		"int lsetxattr(const char *path, const char *name, const void *value, size_t size, int flags)",
		vec![map("path")],
	)?;
	c.wrap("int lstat(const char *file_name, struct stat *buf)", vec![map("file_name")])?;
	c.wrap("int lstat64(const char *file_name, struct stat64 *buf)", vec![map("file_name")])?;
	c.register(
		Target::Wraps,
		Entry::new("int lutimes(const char *filename, const struct timeval tv[2])")
			.annotate(map("filename"))
			.arg_names(["filename", "tv"]),
	)?;
	c.wrap("int mkdir(const char *pathname, mode_t mode)", vec![map("pathname")])?;
	c.wrap("int mkdirat(int dirfd, const char *pathname, mode_t mode)", vec![map_at("dirfd", "pathname")])?;
	c.wrap("int mkfifo(const char *pathname, mode_t mode)", vec![map("pathname")])?;
	c.wrap("int mkfifoat(int dirfd, const char *pathname, mode_t mode)", vec![map_at("dirfd", "pathname")])?;
	c.wrap("int mknod(const char *pathname, mode_t mode, dev_t dev)", vec![map("pathname")])?;
	c.wrap(
		"int mknodat(int dirfd, const char *pathname, mode_t mode, dev_t dev)",
		vec![map_at("dirfd", "pathname")],
	)?;
	c.wrap("int mkstemp(char *template)", vec![map("template")])?;
	c.wrap("int mkstemps(char *template, int suffixlen)", vec![map("template")])?;
	c.wrap("int mkstemp64(char *template)", vec![map("template")])?;
	c.wrap("int mkstemps64(char *template, int suffixlen)", vec![map("template")])?;
	c.register(
		Target::Wraps,
		Entry::new(
			"int nftw(const char *dir, int (*fn)(const char *file, const struct stat *sb, int flag, struct FTW *s), int nopenfd, int flags)",
		)
		.annotate(map("dir"))
		.arg_names(["dir", "fn", "nopenfd", "flags"]),
	)?;
	c.register(
		Target::Wraps,
		Entry::new(
			"int nftw64(const char *dir, int (*fn)(const char *file, const struct stat64 *sb, int flag, struct FTW *s), int nopenfd, int flags)",
		)
		.annotate(map("dir"))
		.arg_names(["dir", "fn", "nopenfd", "flags"]),
	)?;
	c.wrap("DIR *opendir(const char *name)", vec![map("name")])?;
	c.wrap("long pathconf(const char *path, int name)", vec![map("path")])?;
	c.wrap("READLINK_TYPE readlink(const char *path, char *buf, size_t bufsize)", vec![map("path")])?;
	c.wrap(
		"READLINK_TYPE readlinkat(int dirfd, const char *pathname, char *buf, size_t bufsize)",
		vec![map_at("dirfd", "pathname")],
	)?;
	c.wrap("char *realpath(const char *name, char *resolved)", vec![map("name")])?;
	c.wrap("int remove(const char *pathname)", vec![map("pathname")])?;
	c.wrap("int removexattr(const char *path, const char *name)", vec![map("path")])?;
	c.wrap("int rename(const char *oldpath, const char *newpath)", vec![map("oldpath"), map("newpath")])?;
	c.wrap("int revoke(const char *file)", vec![map("file")])?;
	c.wrap("int rmdir(const char *pathname)", vec![map("pathname")])?;
	c.register(
		Target::Wraps,
		Entry::new(
			"int scandir(const char *dir, struct dirent ***namelist, int(*filter)(const struct dirent *), int(*compar)(scandir_arg_t *, scandir_arg_t *))",
		)
		.annotate(map("dir"))
		.arg_names(["dir", "namelist", "filter", "compar"]),
	)?;
	c.register(
		Target::Wraps,
		Entry::new(
			"int scandir64(const char *dir, struct dirent64 ***namelist, int(*filter)(const struct dirent64 *), int(*compar)(scandir64_arg_t *, scandir64_arg_t *))",
		)
		.annotate(map("dir"))
		.arg_names(["dir", "namelist", "filter", "compar"]),
	)?;
	c.wrap(
		"int setxattr(const char *path, const char *name, const void *value, size_t size, int flags)",
		vec![map("path")],
	)?;
	c.wrap("int stat(const char *file_name, struct stat *buf)", vec![map("file_name")])?;
	c.wrap("int stat64(const char *file_name, struct stat64 *buf)", vec![map("file_name")])?;
	c.wrap("int symlink(const char *oldpath, const char *newpath)", vec![map("oldpath"), map("newpath")])?;
	c.wrap("char *tempnam(const char *dir, const char *pfx)", vec![map("dir")])?;
	c.wrap("int truncate(const char *path, off_t length)", vec![map("path")])?;
	c.wrap("int truncate64(const char *path, off64_t length)", vec![map("path")])?;
	c.wrap("int unlink(const char *pathname)", vec![map("pathname")])?;
	c.wrap("int unlinkat(int dirfd, const char *pathname, int flags)", vec![map_at("dirfd", "pathname")])?;
	c.wrap("int utime(const char *filename, const struct utimbuf *buf)", vec![map("filename")])?;
	c.register(
		Target::Wraps,
		Entry::new("int utimes(const char *filename, const struct timeval tv[2])")
			.annotate(map("filename"))
			.arg_names(["filename", "tv"]),
	)?;
	Ok(())
}

fn register_gates(c: &mut CatalogBuilder) -> Result<()> {
	c.gate("int execl (const char *path, const char *arg, ...)", vec![pass_va_list()])?;
	c.gate("int execle (const char *path, const char *arg, ...)", vec![pass_va_list()])?;
	c.gate("int execlp (const char *file, const char *arg, ...)", vec![pass_va_list()])?;
	c.gate("int execv (const char *path, char *const argv[])", vec![])?;
	c.gate("int execve (const char *filename, char *const argv[], char *const envp[])", vec![])?;
	c.gate("int execvp (const char *file, char *const argv[])", vec![])?;
	c.gate("char * getcwd (char *buf, size_t size)", vec![])?;
	c.register(
		Target::Gates,
		Entry::new("char * get_current_dir_name (void)").arg_names(Vec::<String>::new()),
	)?;
	c.gate("char * getwd (char *buf)", vec![])?;
	c.gate("char *mkdtemp (char *template)", vec![])?;
	c.gate("int uname(struct utsname *buf)", vec![])?;
	c.register(
		Target::Gates,
		Entry::new(
			"FTS * fts_open (char * const *path_argv, int options, int (*compar)(const FTSENT **, const FTSENT **))",
		)
		.arg_names(["path_argv", "options", "compar"]),
	)?;
	c.register(
		Target::Gates,
		Entry::new("int glob (const char *pattern, int flags, int (*errfunc) (const char *, int), glob_t *pglob)")
			.annotate(map("pattern"))
			.arg_names(["pattern", "flags", "errfunc", "pglob"]),
	)?;
	c.register(
		Target::Gates,
		Entry::new(
			"int glob64 (const char *pattern, int flags, int (*errfunc) (const char *, int), glob64_t *pglob)",
		)
		.annotate(map("pattern"))
		.arg_names(["pattern", "flags", "errfunc", "pglob"]),
	)?;
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn builds() {
		let catalog = builtin_catalog().unwrap();
		assert_eq!(catalog.wraps().len(), 89);
		assert_eq!(catalog.gates().len(), 14);
		assert_eq!(catalog.wraps()[0].name(), "tmpnam");
		assert_eq!(catalog.gates().last().map(|f| f.name()), Some("glob64"));
	}

	#[test]
	fn every_name_is_an_identifier() {
		let catalog = builtin_catalog().unwrap();
		for func in catalog.wraps().iter().chain(catalog.gates()) {
			for name in func.arg_names() {
				assert!(
					name == "..." || crate::signature::is_c_identifier(name),
					"{}: bad argument name {name:?}",
					func.name()
				);
			}
		}
	}
}
