//! Directive-derived file flags.

use bitflags::bitflags;

bitflags! {
    /// Flags accumulated from `#pragma makedep` directives while a file is
    /// scanned.
    ///
    /// The `IDL_*` flags each request one generated output from an interface
    /// definition and drive the generated-source deriver; `INSTALL` marks
    /// the file itself installable; `RC_PO` marks a resource script as
    /// containing translatable strings.
    #[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
    pub struct FileFlags: u32 {
        /// The file should be installed as-is (`#pragma makedep install`).
        const INSTALL = 1 << 0;
        /// The interface definition generates a header.
        const IDL_HEADER = 1 << 1;
        /// The interface definition generates client stub code.
        const IDL_CLIENT = 1 << 2;
        /// The interface definition generates server stub code.
        const IDL_SERVER = 1 << 3;
        /// The interface definition generates an interface-identifier source.
        const IDL_IDENT = 1 << 4;
        /// The interface definition generates proxy code.
        const IDL_PROXY = 1 << 5;
        /// The interface definition generates a type library.
        const IDL_TYPELIB = 1 << 6;
        /// The interface definition generates a registered type library
        /// resource.
        const IDL_REGTYPELIB = 1 << 7;
        /// The resource script contains translatable strings.
        const RC_PO = 1 << 8;
        /// The object contributes to the unit's import library.
        const C_IMPLIB = 1 << 9;
    }
}

impl FileFlags {
    /// The subset of flags that request generated interface outputs.
    pub const IDL_OUTPUTS: FileFlags = FileFlags::IDL_HEADER
        .union(FileFlags::IDL_CLIENT)
        .union(FileFlags::IDL_SERVER)
        .union(FileFlags::IDL_IDENT)
        .union(FileFlags::IDL_PROXY)
        .union(FileFlags::IDL_TYPELIB)
        .union(FileFlags::IDL_REGTYPELIB);
}
