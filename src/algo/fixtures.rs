use cipher::{dsa, rsa};
use num_bigint::BigUint;
use num_traits::Num;

fn num(s: &str) -> BigUint {
    BigUint::from_str_radix(s, 10).unwrap()
}

/// 512 bits, e = 65537
pub(crate) fn rsa_key() -> rsa::PrivateKey {
    rsa::PrivateKey::new_uncheck_with_factor(
        num("9534682244946710738034288742818651154549465712005500384007707424246941327467527714567023948642042444286761100824673738253886846446173004612165941760067273"),
        num("86948295534003673751714163517713724373525927739711958759620101201778132968231"),
        num("112766727076622173875436080986190418937893731023253795820197193292478698999621"),
        vec![],
    )
    .unwrap()
}

/// 3 primes, 768 bits
pub(crate) fn rsa_multi_prime_key() -> rsa::PrivateKey {
    rsa::PrivateKey::new_uncheck_with_factor(
        num("746849082601822733548546983150175274383747616806740052565726926022146970713578631564987888859451540331838817192702644600205428145720300833803762053793929883081368985574590181599637359183050258016825726409706644172744365333677819393"),
        num("97510661281751385194082674939941616629588094993095932512793130706999177902247"),
        num("113391152949459786861842627425466069954917597121222435764194224047728663683489"),
        vec![num("100303213178510347440994847111841208333140664381507174596990325558207797312221")],
    )
    .unwrap()
}

/// L = 1024, N = 160
pub(crate) fn dsa_params() -> dsa::DomainParameters {
    dsa::DomainParameters::new_uncheck(
        num("138429370872137121386344874067444278877474257420815792366602931333706387893157533507808628101209118415057488611370452191237352946582036877026536168898254827416186177823387023224735768225441517796672113173532201137099750967158189436152203712446744351473013085388641438850644672464209645555106116274948255203761"),
        num("1270320286112842626562076151003062527178355711751"),
        num("94564045573738558949076083783996031897122110853347102620445573029987702640651531257173519141262975606506643340565841163547971426964884389141821457598649030443192886956562937385068503477501332390911045979662612889435514778650528825597897169512394235781576104725998287377452768876453702252742790534587100759866"),
    )
}

pub(crate) fn dsa_x() -> BigUint {
    num("505267961215274105228070970203809070482330114766")
}

pub(crate) fn dsa_key() -> dsa::PrivateKey {
    dsa::PrivateKey::new(Some(dsa_params()), dsa_x())
}
