use phf::{Map, phf_map};

static THREE_TO_ONE: Map<&'static str, char> = phf_map! {
    "ALA" => 'A', "ARG" => 'R', "ASN" => 'N', "ASP" => 'D', "CYS" => 'C',
    "GLN" => 'Q', "GLU" => 'E', "GLY" => 'G', "HIS" => 'H', "ILE" => 'I',
    "LEU" => 'L', "LYS" => 'K', "MET" => 'M', "PHE" => 'F', "PRO" => 'P',
    "SER" => 'S', "THR" => 'T', "TRP" => 'W', "TYR" => 'Y', "VAL" => 'V',
    "HSE" => 'H', "HSD" => 'H', "HSP" => 'H', "MSE" => 'M', "SEC" => 'U',
    "ASX" => 'B', "GLX" => 'Z', "UNK" => 'X',
};

static ONE_TO_THREE: Map<char, &'static str> = phf_map! {
    'A' => "ALA", 'R' => "ARG", 'N' => "ASN", 'D' => "ASP", 'C' => "CYS",
    'Q' => "GLN", 'E' => "GLU", 'G' => "GLY", 'H' => "HIS", 'I' => "ILE",
    'L' => "LEU", 'K' => "LYS", 'M' => "MET", 'F' => "PHE", 'P' => "PRO",
    'S' => "SER", 'T' => "THR", 'W' => "TRP", 'Y' => "TYR", 'V' => "VAL",
    'U' => "SEC", 'B' => "ASX", 'Z' => "GLX", 'X' => "UNK",
};

// Maximum accessible surface area per residue (Sander & Rost, 1994), in square Angstroms.
static MAX_ASA: Map<char, f64> = phf_map! {
    'A' => 106.0, 'R' => 248.0, 'N' => 157.0, 'D' => 163.0, 'C' => 135.0,
    'Q' => 198.0, 'E' => 194.0, 'G' => 84.0, 'H' => 184.0, 'I' => 169.0,
    'L' => 164.0, 'K' => 205.0, 'M' => 188.0, 'F' => 197.0, 'P' => 136.0,
    'S' => 130.0, 'T' => 142.0, 'W' => 227.0, 'Y' => 222.0, 'V' => 142.0,
};

pub fn one_letter_code(three_letter: &str) -> Option<char> {
    THREE_TO_ONE
        .get(three_letter.trim().to_ascii_uppercase().as_str())
        .copied()
}

/// Three-letter name of a residue, `UNK` for anything unrecognized.
pub fn three_letter_code(one_letter: char) -> &'static str {
    ONE_TO_THREE
        .get(&one_letter.to_ascii_uppercase())
        .copied()
        .unwrap_or("UNK")
}

pub fn max_accessible_area(one_letter: char) -> Option<f64> {
    MAX_ASA.get(&one_letter.to_ascii_uppercase()).copied()
}
