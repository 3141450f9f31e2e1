//! Python rule set

/// Declarations for Python sources
pub const PYTHON_CONFIG: &str = r##"
context = [
  [3, "\\b(False|None|True|and|as|assert|async|await|break|class|continue|def|del|elif|else|except|finally|for|from|global|if|import|in|is|lambda|nonlocal|not|or|pass|raise|return|try|while|with|yield)\\b", "keyword"],
  [3, "\\b(abs|all|any|bool|dict|enumerate|float|int|isinstance|len|list|map|max|min|open|print|range|repr|set|sorted|str|sum|super|tuple|type|zip)\\b", "builtin"],
  [3, "\\b[0-9]+(\\.[0-9]*)?\\b", "number"],
  [3, "@[A-Za-z_][A-Za-z0-9_.]*", "decorator"],
  [2, ["\"\"\"", "\"\"\""], "string"],
  [2, ["'''", "'''"], "string"],
  [3, "\"(\\\\.|[^\"\\\\\\n])*\"", "string"],
  [3, "'(\\\\.|[^'\\\\\\n])*'", "string"],
  [1, "#", "comment"],
]

faces = [
  ["default-face", "black", 14, 4],
  ["keyword", "purple", 14, 5],
  ["builtin", "teal", 14, 4],
  ["number", "maroon", 14, 4],
  ["decorator", "olive", 14, 4],
  ["string", "green", 14, 4],
  ["comment", "gray", 14, 6],
]
"##;

/// File extensions handled by the Python rule set
pub const PYTHON_EXTENSIONS: &[&str] = &["py", "pyw", "pyi"];
