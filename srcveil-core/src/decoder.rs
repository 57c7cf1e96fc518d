//! Marker finalization
//!
//! Scans transformed text for `__ENC__` markers. When present, a fixed
//! placeholder decoder routine is prepended and `printf` calls whose whole
//! argument is a single marker literal are rewritten to call it. Markers in
//! any other position (embedded in a larger literal, non-printf calls) are
//! left as-is; the decoder itself only prints `[DECODED:<payload>]` rather
//! than performing a real base64 decode.

use regex::Regex;

use crate::passes::MARKER_PREFIX;

/// The placeholder decoder routine injected ahead of marker-bearing output
const DECODER_SNIPPET: &str = r#"
/* runtime decoder (demo) */
#include <stdlib.h>
#include <string.h>
#include <stdio.h>

/* Prints "[DECODED:<payload>]" for a marker argument. Placeholder only,
   no actual base64 decoding happens here. */
static void _decode_and_print(const char* enc_marker) {
    const char *start = strstr(enc_marker, "__ENC__");
    if (!start) { printf("%s", enc_marker); return; }
    start += 7;
    const char *end = strstr(start, "__");
    if (!end) { printf("%s", enc_marker); return; }
    size_t len = end - start;
    char *payload = (char*)malloc(len + 1);
    memcpy(payload, start, len); payload[len] = 0;
    printf("[DECODED:%s]", payload);
    free(payload);
}
"#;

/// Rewrite whole-argument marker calls and prepend the decoder.
///
/// Text without markers is returned unchanged; the decoder block is never
/// injected into marker-free output.
pub fn finalize_markers(source: &str) -> String {
    if !source.contains(MARKER_PREFIX) {
        return source.to_string();
    }

    let re = Regex::new(r#"printf\s*\(\s*"__ENC__([A-Za-z0-9+/=]*)__"\s*\)\s*;"#).unwrap();
    let rewritten = re.replace_all(source, "_decode_and_print(\"__ENC__${1}__\");");

    format!("{}\n{}", DECODER_SNIPPET, rewritten)
}
