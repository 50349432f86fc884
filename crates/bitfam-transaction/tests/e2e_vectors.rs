//! End-to-end vectors: derive keys from a mnemonic, build a payment from a
//! fixed UTXO set with a given fee, sign it and compare the txid.

use bip32::{ChildNumber, XPrv};
use bip39::{Language, Mnemonic};

use bitfam_primitives::ec::PrivateKey;
use bitfam_script::Script;
use bitfam_transaction::{Chain, UnspentOutput, UnspentTransactionTemplate};

const MNEMONIC: &str = "crowd spot cake box physical limit sniff equip bless return fly labor";

/// (address, value, output index, locking script, txid as displayed)
type UtxoRow = (&'static str, u64, u32, &'static str, &'static str);

struct Case {
    amount: u64,
    address: &'static str,
    fee: u64,
    change: &'static str,
    txid: &'static str,
}

const BITCOIN_UTXOS: &[UtxoRow] = &[
    ("13T2yoS3jE2nd27cYA4EXcUhoTRMfxMHao", 16442, 0, "76a9141adcb8050ca62a6132d4aface1fa86c56a36ed9f88ac", "e50dc7fa5cc1886be9e7121260fa2d859c31ae77391cc94db1a3e18bc746126a"),
    ("1KszQNGFDgBJ6b8cU6N1Nt3X2YwfRbx24D", 11069, 0, "76a914cf16facdc4581b0e07aa9030fdc582e88cc5d91088ac", "a179f6f4cf2b6be50ec5a5fc7cc2c9c29e8b033cda5e213687feb9ef289daa84"),
    ("1JTQLqq5qnsBkYf42yHTcP25VXQV21Euzb", 40327, 1, "76a914bf787036c4e4b0948a75aa8a73847d750b88715888ac", "97541ac9dbe6734998b33fadd3ff5c360a024d8f50d59d3b6a12459ce1ba7a5e"),
    ("14V963RpPaib7WGa3zhadqzBYbz9fx1s4Q", 6389, 0, "76a914263ac66077d2c8a27bf30054d02ead7821d918f188ac", "eeef451481f94190a3eb99d05b64667ed117e403ee7cd910a1e1e01f9252304f"),
    ("1LusiyhNzC9hkrpu22QoNW3eBxeDbfjuuU", 1109, 1, "76a914da6a5ca95d0c03d5b5f9fc36fb4057fec369866c88ac", "74e9ad4f743ec9de79f77b3aa52886fcde91fed0716d6d49f19a6e549d7bfdac"),
    ("15dLEiJsw9afSLTM1nxP8AbnFNx5Ehj1We", 14600, 0, "76a91432bf891752bfd6a0ef2393758c2792d8fe3d667e88ac", "5a4711fac7bb141f7154a35e3e779b5b677322376d86bf2b6e1d692efe301641"),
    ("1K6XMVuJ3AiF9yatTxzC3XdWKgoLDuS2wx", 1000, 0, "76a914c67dae8243379af91884e1b64292eb28b647dead88ac", "bfbd334516ad1867d185aa719e08ef2c621c97f3bedbbf6c181c999e492687a5"),
    ("1F1cvsDuqxBiXZ19ia7PgPryDwdaq6otwZ", 1000, 0, "76a91499afc0b4e27fde66f3c27e22c6a4f41f0fa4f35288ac", "7617f948fb459265580196fc9aee97745e19d0131c4e6e129c0fa32f65e635f0"),
    ("18S5qv8kEVk3xqq2erLPSHpf2TL8PHbLLi", 8282, 1, "76a91451875294bbc1292d7c8700dfb8c684c7e44de00e88ac", "9aa0249eca01f256c0176f4441748ba8b830a467f8110cc3fcbacb7cb9bfe717"),
    ("17zsYZPsnKV4Gi88sdVCc7rLN9BMnhPWUS", 2857, 1, "76a9144cc2a8189319e20dce079f1c7a870fd26ef3403f88ac", "cb5a4e47f03f6578f3ef010c55e82dbb1cb04da4a2a0b86c3cacba49c0770f86"),
    ("1QgvqfzVSP5i5cTiBQkAUMmg44v2DqZzL", 1000, 0, "76a914047ae5c632492c324427176c0e097355d5c74e0488ac", "cd488a2aeb9666d548123b40a7d516128c4b12f22f670190815559938e0e7e26"),
    ("1Lu5EU5PSG6Hc6SspGqRDtHvHqsBe9wpfJ", 1000, 0, "76a914da438d816f184805491cdc8d223c1431888fcd8488ac", "06cce6e467e309fc689df723cee3b86ee0f05f304ce3e4152fd25e9519122c19"),
    ("1GuTZa87BbjAwT7Q268nak9BaBNcKmRrfk", 6130, 1, "76a914ae75b072d1bf569411f96875ade0c63b6a92676688ac", "2ecc93cd40f45901141e6535a7f069529fd22a7721aa19d0dd22bdb092517b97"),
    ("1BDVu9iS5cequN6e1bSnFvtaqdq7qxXLoa", 10000, 0, "76a914700e5f87f4f9fd7d4aa80ff3b051d79b3915649888ac", "0bb146d61d016cffc46299245a0376fc0ad020e6ca3c6dc3807a252344373c38"),
    ("1H2daGe6yKqmcgb7v5W54amYghY6oE7kWd", 5720, 1, "76a914afd0f56801a022fae815cbe338a82526574a3b1488ac", "3eea0b34e82e85e0a6e908fa73a7ac82a26af65eb7c7329a6a23b41dfaeb5688"),
    ("1McfLbz2xCy4UY7idxZrXeQuXWPthcm4BF", 1000, 0, "76a914e22113c86a4feab17f8f0e51ad73468b8473dfa888ac", "46de1d9cf9bcc6cf023044a1f2723b048b5711541901a7d9882ba320cef695f0"),
    ("1AurC3J2D8yvbxQzSrqM74rFQtTVcDjK8t", 8002, 1, "76a9146cb7d2f7b901daaf9ab2c1123d335f92a4f4c06a88ac", "1a5f4523aa9bfc30943a3830cacb1b5dd284c38495f69c4d33b2e7d26ca1a6ed"),
    ("1HGkvA6QRr9uHWsFW6B85BXhyuJPY6oy9E", 10000, 0, "76a914b27ce95f699fd1a34a4e5760318ca276f3b3804a88ac", "5ce36567cf628928e06699e0e587e4463b163aa4b47d42fa64971158ac1d262a"),
    ("172euGESc3RcHLMTyAvBLsaqyn4xYj8aiS", 10000, 0, "76a9144220cf1392a9d9db846435d6f61de3593fb25e5a88ac", "5a8989306d9b358a7f52d47ab59e70c86409c69f3e881d24c6766bf8377a09b8"),
    ("127ZNoRsbXmVMFtH2f8YTwdBHbtHHw5BB8", 1000, 0, "76a9140c35a5c72ad937fec4b0ea52f9899bf2230204d288ac", "107eeafdd5ce2557a6268c687a293103dc6f6e2568486419ec9d55e9ac839cde"),
    ("1CGsyeMGuqvU3iogopFwjw4rWyHooGGGAc", 1000, 0, "76a9147baa2d1aa465b528db43d3f3b652e49246fe958e88ac", "e5cb7ecc8b6a69e14e484c32551006a5ec0d6cf85e1ef923705fd32bf6920f74"),
    ("14pnVi5uocqsGaFP83S7FpAAQkXWfmUoeH", 1000, 0, "76a91429f1e7a3f02750c87809d7ed431ead279a5690b488ac", "28cb46538441501a02dcf8d8e58240c73f03ae1b6263b1745d6d858207861eb2"),
    ("1HJScuLJ8ZhgLo44AQ2sRrksEwSHKj7gqg", 1000, 0, "76a914b2ce78350885262da02f1c441e2346a76da2184e88ac", "9375335d00754a5ecbae9176d673bd48ef94fcb36fed9f4fb832eda14b24ff42"),
    ("1C52jBVCtQPBq8Fx2hCgi4Hq4UkBRX1uwq", 2000, 0, "76a914796c7d43559b79d85fb423c6f7d7a859fd59656788ac", "482583232735a3875dd2b0b6df0c10aba08737997d2f039e45c278a7af9b0f15"),
    ("19vmKYBVgSFrqt1s9TxWU1ExkwF9bkxdZS", 2170, 0, "76a91461ec0c63a6e6c032a3a95deb21d27fba7125cb6c88ac", "cd5d957349532de45ab66bb5749da8b82480bdf59720cd7b650568d678a147de"),
    ("1C2goqTCER6c31Re9FRxDTAcGugqzBn5Lo", 3080, 1, "76a91478fb077ab7bea1c7782d0fb5381bbdcc5a6a256a88ac", "ac28a977e4cc9c32c4dc03e11d7fe710a3d582b340b86c3007de77399dcf01e8"),
    ("18uiXzWF2ESqaUg5m4tHMnbSW1CNz1NDHQ", 2180, 0, "76a91456c12e7e6d4fa1b84b4c0a4e3a095918ce54971888ac", "69c4005ae39041946d30af0e1a0728aa7d4b5e94e21e38e2fd9b7e722b2e3676"),
    ("1Aqps6XmvhToWBqfgMfU2ab4S15YVVh8B", 1212, 1, "76a91401dc803bb34b86daabeda71404a0cc01d318c47088ac", "1d1e1c54a7acb5f65661a8baa32888d05b0e66fdecb1000e31d5519810db8fd3"),
    ("1HQDMc57yBxKR6EwUcEgraBzdrGFBVTZ67", 670, 0, "76a914b3e5e4afcb1bd839e429ff753e51dbf38612bd8b88ac", "ec4ea6d8ac590322f4fa590c17e22a8a293698d60b30d5346c4e3309697fbcf0"),
    ("1M4oFuQw4pC8jmLiy9i9wN2hHWMLGGedG8", 1000, 0, "76a914dc1a607e3f20c73a1797d737dd7218ae0e41e59288ac", "7c6cf30a7398e9b37cb929d9d8522e8d801909741cdb71794c8432861e0c60c6"),
    ("1As1rg5ZpqWhDQivUNkyVyaAhk1fFFuxjC", 307355, 1, "76a9146c2ea5231f7def2319d81f246723d19c0446e09a88ac", "2d3874502b8f3b30e2446b63a7cd970180b38d382c5b13fe17071ba79604456d"),
    ("1EWVBhiaJLCYw2LFcstFwpXkN2r7usRM4d", 11032, 1, "76a914942d39af50f841a307ffdf91d97d6bbed61e52a588ac", "e7dcb8cfe9628aba9dc05050c2d7b088348ecf069ee3238b0b3cc134eeb02e87"),
];

const BITCOIN_CASES: &[Case] = &[
    Case {
        amount: 330000,
        address: "18uiXzWF2ESqaUg5m4tHMnbSW1CNz1NDHQ",
        fee: 1870,
        change: "1JTQLqq5qnsBkYf42yHTcP25VXQV21Euzb",
        txid: "0ba3e80c72df11ca464c9af3132154b8ae003278cc445d4497b87b25436bac70",
    },
    Case {
        amount: 10000,
        address: "18uiXzWF2ESqaUg5m4tHMnbSW1CNz1NDHQ",
        fee: 904,
        change: "1JTQLqq5qnsBkYf42yHTcP25VXQV21Euzb",
        txid: "ec4b16aa1b44442fa9f9f6a424aff7016b311836d86846becbc6addd49c373cc",
    },
    Case {
        amount: 30000,
        address: "1EWVBhiaJLCYw2LFcstFwpXkN2r7usRM4d",
        fee: 1130,
        change: "1JTQLqq5qnsBkYf42yHTcP25VXQV21Euzb",
        txid: "08e4ced7377c3a5327575167fbaa9719c5ba8be696592ac5f59a3b835fcac475",
    },
    Case {
        amount: 360000,
        address: "1EWVBhiaJLCYw2LFcstFwpXkN2r7usRM4d",
        fee: 2610,
        change: "13UVUWmw2nrnmuQ1yPbJChkb7dMDRUpcvH",
        txid: "0722c3e43d8d3e379a1466b3db37152e382545096b824c5883820e00d0d8c39a",
    },
    Case {
        amount: 40000,
        address: "1C52jBVCtQPBq8Fx2hCgi4Hq4UkBRX1uwq",
        fee: 1130,
        change: "1EWVBhiaJLCYw2LFcstFwpXkN2r7usRM4d",
        txid: "6b2f43593cc0f5bbb72093f4098593bc7fff5d33a033bcff192d434bb13f82af",
    },
    Case {
        amount: 220000,
        address: "1EWVBhiaJLCYw2LFcstFwpXkN2r7usRM4d",
        fee: 452,
        change: "1AurC3J2D8yvbxQzSrqM74rFQtTVcDjK8t",
        txid: "fae67d6b9053cd41671d645c3f45d2c7e7e0da9191ebf2719a5e983934775ab3",
    },
    Case {
        amount: 223000,
        address: "1AurC3J2D8yvbxQzSrqM74rFQtTVcDjK8t",
        fee: 1130,
        change: "1EWVBhiaJLCYw2LFcstFwpXkN2r7usRM4d",
        txid: "92cf9b8bb7bee0285223ac21505a74f5766f673923532e66c900f197f35505dc",
    },
];

const BITCOIN_CASH_UTXOS: &[UtxoRow] = &[
    ("1KvcHonBsr8xthqm1wWvLTz5TReFneHmyT", 1000, 0, "76a914cf95c4bc40fdc8bb14434615916839b2015a79f288ac", "0ffe161640e43077e6f7bf875c00be69c2cba344ba923bbf039cd5ca6fec041a"),
    ("1CpRxkuWeVJKKBBVYxNRhjnS4xAXnyUpZ4", 1000, 0, "76a91481a1c53efdfbf5f69b407738f3d2735d66dab94f88ac", "1ccc25d418db6f8607260cbb6d69620cf3c0bd6e50035b950419f86076e1b27f"),
    ("1Hr562LyDDUXZHA6W2DXk81fwwgSU7X1dm", 10000, 0, "76a914b8c9ce55b788268de6d9c189c22f24ce80f8abba88ac", "b2449abf8985b5909932636843ab0217a3985a302261c745a8c4c4ed7ca7682a"),
    ("12zu7CovhcTdzhXqKPYyW4PMEPSqUZwR1P", 100000, 0, "76a91415eb5511e6de9d10a3b1a322487d2753f074ced288ac", "96d717f69b944dc99fb4593a81d595a0e009be24589cdab895d88232c7bd5005"),
    ("1G9GDLH2DFz86KCi5okgT3JBaiKyyaTn4W", 10000, 0, "76a914a619e9ced4b2638614b635be97bdbc389fe648f988ac", "2c58298387dfe8d6bce74cfbd572099758ab65b0ff415a13c58061f674e6f9fb"),
    ("1P9Sa66udPLALu7k5waJNDz2pxpxcNuxuJ", 10000, 0, "76a914f2eb70aa74e064b8a22ac9e396fd295cb4f2c69388ac", "fc4f1448114141b8070f29eebaddfb2e56a36efd60eb436ea7b60d21c62bdf9d"),
];

const BITCOIN_CASH_CASES: &[Case] = &[
    Case {
        amount: 10000,
        address: "1P9Sa66udPLALu7k5waJNDz2pxpxcNuxuJ",
        fee: 678,
        change: "1Hr562LyDDUXZHA6W2DXk81fwwgSU7X1dm",
        txid: "f35b2562ef0fe8097b93925fd5cc6eb1597599c046f6225ffcd69a5e5f97e77f",
    },
    Case {
        amount: 120000,
        address: "1CpRxkuWeVJKKBBVYxNRhjnS4xAXnyUpZ4",
        fee: 2010,
        change: "12zu7CovhcTdzhXqKPYyW4PMEPSqUZwR1P",
        txid: "5c1cd9923b459888bbc6f415a77d8d99f40094226ec217cbc84576fb9a7974db",
    },
    Case {
        amount: 30000,
        address: "1CpRxkuWeVJKKBBVYxNRhjnS4xAXnyUpZ4",
        fee: 678,
        change: "1P9Sa66udPLALu7k5waJNDz2pxpxcNuxuJ",
        txid: "23b1c72ce7dea36b3ffc7a534cf6ebf1248bdaceca16fd68cbea742fc44603db",
    },
    Case {
        amount: 1000,
        address: "12zu7CovhcTdzhXqKPYyW4PMEPSqUZwR1P",
        fee: 678,
        change: "1P9Sa66udPLALu7k5waJNDz2pxpxcNuxuJ",
        txid: "150c12d09a9529699276cdb88d8a0ec01e145954400b4d8666f4f3cfe2bf83a3",
    },
    Case {
        amount: 50000,
        address: "1CpRxkuWeVJKKBBVYxNRhjnS4xAXnyUpZ4",
        fee: 678,
        change: "1KvcHonBsr8xthqm1wWvLTz5TReFneHmyT",
        txid: "6417914442c8678d3bdffa1979d68b149ea2be0994649c846f5a41376ba6c609",
    },
    Case {
        amount: 110000,
        address: "1Hr562LyDDUXZHA6W2DXk81fwwgSU7X1dm",
        fee: 1566,
        change: "1P9Sa66udPLALu7k5waJNDz2pxpxcNuxuJ",
        txid: "9c618b6f5243936401cd0b3f0760574fbdc917495c159e58df458faec9a8e913",
    },
];

/// Receive and change keys `m/44'/coin'/0'/{0,1}/0..count`.
fn derive_keys(coin_type: u32, count: u32) -> Vec<PrivateKey> {
    let mnemonic = Mnemonic::parse_in_normalized(Language::English, MNEMONIC).unwrap();
    let seed = mnemonic.to_seed("");

    let mut keys = Vec::new();
    for branch in 0..2 {
        let path = format!("m/44'/{}'/0'/{}", coin_type, branch);
        let parent = XPrv::derive_from_path(seed, &path.parse().unwrap()).unwrap();
        for index in 0..count {
            let child = parent
                .derive_child(ChildNumber::new(index, false).unwrap())
                .unwrap();
            let bytes = child.private_key().to_bytes();
            keys.push(PrivateKey::from_bytes(bytes.as_slice()).unwrap());
        }
    }
    keys
}

fn utxos(rows: &[UtxoRow]) -> Vec<UnspentOutput> {
    rows.iter()
        .map(|(address, value, index, script, txid)| {
            UnspentOutput::from_txid_hex(
                address,
                *value,
                *index,
                Script::from_hex(script).unwrap(),
                txid,
            )
            .unwrap()
        })
        .collect()
}

fn check(chain: Chain, rows: &[UtxoRow], cases: &[Case], keys: &[PrivateKey]) {
    let set = utxos(rows);
    for case in cases {
        let template = UnspentTransactionTemplate::new(
            chain,
            case.amount,
            case.address,
            case.change,
            set.clone(),
            false,
        );
        let unsigned = template.build_with_fee(case.fee).expect("should build");
        assert_eq!(
            unsigned.total_input_value().unwrap() - unsigned.total_output_value().unwrap(),
            case.fee,
            "amount {}",
            case.amount
        );

        let signed = unsigned.sign(keys).expect("should sign");
        assert_eq!(signed.tx_id().to_string(), case.txid, "amount {}", case.amount);
    }
}

#[test]
fn bitcoin_vectors() {
    let keys = derive_keys(0, 50);
    check(Chain::Bitcoin, BITCOIN_UTXOS, BITCOIN_CASES, &keys);
}

#[test]
fn bitcoin_cash_vectors() {
    let keys = derive_keys(145, 30);
    check(Chain::BitcoinCash, BITCOIN_CASH_UTXOS, BITCOIN_CASH_CASES, &keys);
}
