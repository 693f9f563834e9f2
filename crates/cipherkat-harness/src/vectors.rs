//! Built-in known-answer fixtures.
//!
//! Flat stride-5 groups: `label, key, iv, plaintext, ciphertext` (hex).
//! CTR and unpadded CBC rows are NIST SP 800-38A (F.5.1/F.5.3/F.5.5 and
//! F.2.1/F.2.3/F.2.5); the padded CBC rows reuse the F.2.1 key and IV.

pub const AES_CTR_NOPADDING: &[&str] = &[
    "sp800-38a-f5.1-block1",
    "2B7E151628AED2A6ABF7158809CF4F3C",
    "F0F1F2F3F4F5F6F7F8F9FAFBFCFDFEFF",
    "6BC1BEE22E409F96E93D7E117393172A",
    "874D6191B620E3261BEF6864990DB6CE",
    //
    "sp800-38a-f5.1",
    "2B7E151628AED2A6ABF7158809CF4F3C",
    "F0F1F2F3F4F5F6F7F8F9FAFBFCFDFEFF",
    "6BC1BEE22E409F96E93D7E117393172AAE2D8A571E03AC9C9EB76FAC45AF8E5130C81C46A35CE411E5FBC1191A0A52EFF69F2445DF4F9B17AD2B417BE66C3710",
    "874D6191B620E3261BEF6864990DB6CE9806F66B7970FDFF8617187BB9FFFDFF5AE4DF3EDBD5D35E5B4F09020DB03EAB1E031DDA2FBE03D1792170A0F3009CEE",
    //
    "sp800-38a-f5.3",
    "8E73B0F7DA0E6452C810F32B809079E562F8EAD2522C6B7B",
    "F0F1F2F3F4F5F6F7F8F9FAFBFCFDFEFF",
    "6BC1BEE22E409F96E93D7E117393172AAE2D8A571E03AC9C9EB76FAC45AF8E5130C81C46A35CE411E5FBC1191A0A52EFF69F2445DF4F9B17AD2B417BE66C3710",
    "1ABC932417521CA24F2B0459FE7E6E0B090339EC0AA6FAEFD5CCC2C6F4CE8E941E36B26BD1EBC670D1BD1D665620ABF74F78A7F6D29809585A97DAEC58C6B050",
    //
    "sp800-38a-f5.5",
    "603DEB1015CA71BE2B73AEF0857D77811F352C073B6108D72D9810A30914DFF4",
    "F0F1F2F3F4F5F6F7F8F9FAFBFCFDFEFF",
    "6BC1BEE22E409F96E93D7E117393172AAE2D8A571E03AC9C9EB76FAC45AF8E5130C81C46A35CE411E5FBC1191A0A52EFF69F2445DF4F9B17AD2B417BE66C3710",
    "601EC313775789A5B7A7F504BBF3D228F443E3CA4D62B59ACA84E990CACAF5C52B0930DAA23DE94CE87017BA2D84988DDFC9C58DB67AADA613C2DD08457941A6",
    //
    "partial-final-block",
    "2b7e151628aed2a6abf7158809cf4f3c",
    "f0f1f2f3f4f5f6f7f8f9fafbfcfdfeff",
    "6bc1bee22e409f96e93d7e117393172aae2d8a571e03ac",
    "874d6191b620e3261bef6864990db6ce9806f66b7970fd",
    //
    "counter-wrap",
    "2B7E151628AED2A6ABF7158809CF4F3C",
    "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF",
    "6BC1BEE22E409F96E93D7E117393172AAE2D8A571E03AC9C9EB76FAC45AF8E51",
    "E13338E36CB71962E00D020B4CEDBD86D3DAE15B04BB352FA0F59FEBFCB4DA3E",
];

pub const AES_CBC_NOPADDING: &[&str] = &[
    "sp800-38a-f2.1-block1",
    "2B7E151628AED2A6ABF7158809CF4F3C",
    "000102030405060708090A0B0C0D0E0F",
    "6BC1BEE22E409F96E93D7E117393172A",
    "7649ABAC8119B246CEE98E9B12E9197D",
    //
    "sp800-38a-f2.1",
    "2B7E151628AED2A6ABF7158809CF4F3C",
    "000102030405060708090A0B0C0D0E0F",
    "6BC1BEE22E409F96E93D7E117393172AAE2D8A571E03AC9C9EB76FAC45AF8E5130C81C46A35CE411E5FBC1191A0A52EFF69F2445DF4F9B17AD2B417BE66C3710",
    "7649ABAC8119B246CEE98E9B12E9197D5086CB9B507219EE95DB113A917678B273BED6B8E3C1743B7116E69E222295163FF1CAA1681FAC09120ECA307586E1A7",
    //
    "sp800-38a-f2.3",
    "8E73B0F7DA0E6452C810F32B809079E562F8EAD2522C6B7B",
    "000102030405060708090A0B0C0D0E0F",
    "6BC1BEE22E409F96E93D7E117393172AAE2D8A571E03AC9C9EB76FAC45AF8E5130C81C46A35CE411E5FBC1191A0A52EFF69F2445DF4F9B17AD2B417BE66C3710",
    "4F021DB243BC633D7178183A9FA071E8B4D9ADA9AD7DEDF4E5E738763F69145A571B242012FB7AE07FA9BAAC3DF102E008B0E27988598881D920A9E64F5615CD",
    //
    "sp800-38a-f2.5",
    "603DEB1015CA71BE2B73AEF0857D77811F352C073B6108D72D9810A30914DFF4",
    "000102030405060708090A0B0C0D0E0F",
    "6BC1BEE22E409F96E93D7E117393172AAE2D8A571E03AC9C9EB76FAC45AF8E5130C81C46A35CE411E5FBC1191A0A52EFF69F2445DF4F9B17AD2B417BE66C3710",
    "F58C4C04D6E5F1BA779EABFB5F7BFBD69CFC4E967EDB808D679F777BC6702C7D39F23369A9D9BACFA530E26304231461B2EB05E2C39BE9FCDA6C19078C6A9D1B",
];

pub const AES_CBC_PKCS5PADDING: &[&str] = &[
    "empty-message",
    "2B7E151628AED2A6ABF7158809CF4F3C",
    "000102030405060708090A0B0C0D0E0F",
    "",
    "C84AF0B613435D5D9182801A9BD9320B",
    //
    "one-byte",
    "2B7E151628AED2A6ABF7158809CF4F3C",
    "000102030405060708090A0B0C0D0E0F",
    "6B",
    "2A7A633FAD54E2146EDCEF80C59EEBC6",
    //
    "full-block-adds-pad-block",
    "2B7E151628AED2A6ABF7158809CF4F3C",
    "000102030405060708090A0B0C0D0E0F",
    "6BC1BEE22E409F96E93D7E117393172A",
    "7649ABAC8119B246CEE98E9B12E9197D8964E0B149C10B7B682E6E39AAEB731C",
    //
    "twenty-bytes",
    "2B7E151628AED2A6ABF7158809CF4F3C",
    "000102030405060708090A0B0C0D0E0F",
    "6BC1BEE22E409F96E93D7E117393172AAE2D8A57",
    "7649ABAC8119B246CEE98E9B12E9197D2E013F890472D82217B17F45F6E7F539",
    //
    "forty-seven-bytes",
    "2B7E151628AED2A6ABF7158809CF4F3C",
    "000102030405060708090A0B0C0D0E0F",
    "6BC1BEE22E409F96E93D7E117393172AAE2D8A571E03AC9C9EB76FAC45AF8E5130C81C46A35CE411E5FBC1191A0A52",
    "7649ABAC8119B246CEE98E9B12E9197D5086CB9B507219EE95DB113A917678B28A70A22E82B7DF9EF0EE70BC0A27DB50",
    //
    "aes256-25-bytes",
    "603DEB1015CA71BE2B73AEF0857D77811F352C073B6108D72D9810A30914DFF4",
    "000102030405060708090A0B0C0D0E0F",
    "6BC1BEE22E409F96E93D7E117393172AAE2D8A571E03AC9C9E",
    "F58C4C04D6E5F1BA779EABFB5F7BFBD668E4696067E327818ECB60D6B44655CD",
];
