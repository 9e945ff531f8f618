pub mod residue_codes;
