//! Subdirectory list construction.
//!
//! The list is a pure function of [`SubdirOptions`]: exactly one of the two
//! standard-library variants comes first, followed by the fixed component
//! tail in a fixed order.

/// The alternate standard library, selected by `use_newlib`.
pub const NEWLIB: &str = "newlib";

/// The default standard-library components.
pub const DEFAULT_STDLIBS: [&str; 2] = ["MAStd", "MAFS"];

/// Components built after the standard library, in build order:
/// utility library, XML library, UI library, test library.
pub const COMPONENTS: [&str; 4] = ["MAUtil", "MTXml", "MAUI", "MATest"];

/// Component kept out of the default list. Only appended when
/// [`SubdirOptions::include_minui`] is set.
pub const MINUI: &str = "MinUI";

/// Inputs to [`subdir_list`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubdirOptions {
  /// Build against `newlib` instead of `MAStd` + `MAFS`.
  pub use_newlib: bool,

  /// Append the optional `MinUI` component.
  pub include_minui: bool,
}

/// Returns the standard-library prefix for the given variant.
pub fn stdlib_subdirs(use_newlib: bool) -> &'static [&'static str] {
  if use_newlib { &[NEWLIB] } else { &DEFAULT_STDLIBS }
}

/// Build the ordered subdirectory list.
pub fn subdir_list(options: &SubdirOptions) -> Vec<String> {
  let mut subdirs: Vec<String> = stdlib_subdirs(options.use_newlib)
    .iter()
    .chain(COMPONENTS.iter())
    .map(|s| s.to_string())
    .collect();

  if options.include_minui {
    subdirs.push(MINUI.to_string());
  }

  subdirs
}

#[cfg(test)]
mod tests {
  use super::*;

  fn tail(list: &[String], len: usize) -> &[String] {
    &list[list.len() - len..]
  }

  #[test]
  fn default_stdlib_list() {
    let list = subdir_list(&SubdirOptions::default());
    assert_eq!(list, vec!["MAStd", "MAFS", "MAUtil", "MTXml", "MAUI", "MATest"]);
  }

  #[test]
  fn newlib_list() {
    let list = subdir_list(&SubdirOptions {
      use_newlib: true,
      ..Default::default()
    });
    assert_eq!(list, vec!["newlib", "MAUtil", "MTXml", "MAUI", "MATest"]);
  }

  #[test]
  fn tail_identical_for_both_variants() {
    let with = subdir_list(&SubdirOptions {
      use_newlib: true,
      ..Default::default()
    });
    let without = subdir_list(&SubdirOptions::default());
    assert_eq!(tail(&with, COMPONENTS.len()), tail(&without, COMPONENTS.len()));
  }

  #[test]
  fn never_contains_both_variants() {
    for use_newlib in [true, false] {
      let list = subdir_list(&SubdirOptions {
        use_newlib,
        include_minui: true,
      });
      let has_newlib = list.iter().any(|s| s == NEWLIB);
      let has_default = list.iter().any(|s| DEFAULT_STDLIBS.contains(&s.as_str()));
      assert!(has_newlib != has_default, "list {:?} mixes stdlib variants", list);
    }
  }

  #[test]
  fn minui_excluded_unless_requested() {
    assert!(!subdir_list(&SubdirOptions::default()).iter().any(|s| s == MINUI));

    let list = subdir_list(&SubdirOptions {
      use_newlib: false,
      include_minui: true,
    });
    assert_eq!(list.last().map(String::as_str), Some(MINUI));
  }

  #[test]
  fn map_never_listed() {
    for use_newlib in [false, true] {
      for include_minui in [false, true] {
        let list = subdir_list(&SubdirOptions {
          use_newlib,
          include_minui,
        });
        assert!(!list.iter().any(|s| s == "MAP"), "{:?}", list);
      }
    }
  }
}
