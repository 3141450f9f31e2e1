//! C/C++ rule set

/// Declarations for C and C++ sources
///
/// Keywords and numbers come first so that strings and comments, declared
/// last, paint over anything they contain.
pub const C_CONFIG: &str = r##"
context = [
  [3, ["\\b(auto|break|case|char|const|continue|default|do|double|else|enum|extern|float|for|goto|if|inline|int|long|register|restrict|return|short|signed|sizeof|static|struct|switch|typedef|union|unsigned|void|volatile|while)\\b", []], "keyword"],
  [3, "\\b(alignas|alignof|bool|catch|class|constexpr|const_cast|decltype|delete|dynamic_cast|explicit|false|friend|mutable|namespace|new|noexcept|nullptr|operator|private|protected|public|reinterpret_cast|static_assert|static_cast|template|this|throw|true|try|typename|using|virtual)\\b", "keyword"],
  [3, "\\b(size_t|ptrdiff_t|intptr_t|uintptr_t|u?int(8|16|32|64)_t|FILE|NULL)\\b", "type"],
  [3, "\\b(0[xX][0-9a-fA-F]+|[0-9]+(\\.[0-9]*)?([eE][+-]?[0-9]+)?)[uUlLfF]*\\b", "number"],
  [3, ["^[ \\t]*#[ \\t]*[a-z]+", ["newline"]], "preprocessor"],
  [3, "'(\\\\.|[^'\\\\])'", "string"],
  [2, ["\"", "\""], "string"],
  [1, "//", "comment"],
  [2, ["/*", "*/"], "comment"],
]

faces = [
  ["default-face", "black", 14, 4],
  ["keyword", "navy", 14, 5],
  ["type", "teal", 14, 4],
  ["number", "maroon", 14, 4],
  ["preprocessor", "purple", 14, 4],
  ["string", "green", 14, 4],
  ["comment", "gray", 14, 6],
]
"##;

/// File extensions handled by the C rule set
pub const C_EXTENSIONS: &[&str] = &["c", "h", "cpp", "hpp", "cc", "cxx", "hxx"];
