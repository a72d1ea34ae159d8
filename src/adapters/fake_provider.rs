use crate::domain::{GeneratorArgs, GeneratorError, GeneratorProvider};
use chrono::format::{Item, StrftimeItems};
use chrono::{Months, NaiveDate, Utc};
use fake::faker::{address, color, company, currency, internet, job, lorem, name, number, phone_number};
use fake::faker::boolean::raw::Boolean;
use fake::locales::Data;
use fake::Fake;
use rand::{Rng, RngCore};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::fmt::Write;

type GeneratorFn<L> = fn(L, &GeneratorArgs, &mut dyn RngCore) -> Result<Value, GeneratorError>;

/// Provider groups recognised in the `providers` setting.
///
/// Every group is always registered; the list only exists so misspelled
/// names can be reported.
pub const PROVIDER_GROUPS: &[&str] = &[
    "address",
    "color",
    "company",
    "currency",
    "date_time",
    "internet",
    "job",
    "lorem",
    "misc",
    "person",
    "phone_number",
    "python",
    "ssn",
];

/// Names in `providers` that match no known provider group
pub fn unknown_providers(providers: &[String]) -> Vec<&str> {
    providers
        .iter()
        .map(String::as_str)
        .filter(|p| !PROVIDER_GROUPS.contains(p))
        .collect()
}

/// Generator provider backed by the `fake` crate, localised by `L`.
pub struct FakeProvider<L> {
    locale: L,
    registry: HashMap<&'static str, GeneratorFn<L>>,
}

impl<L> FakeProvider<L>
where
    L: Data + Copy + Send + Sync + 'static,
{
    pub fn new(locale: L) -> Self {
        let mut registry: HashMap<&'static str, GeneratorFn<L>> = HashMap::new();

        // person
        registry.insert("name", full_name::<L>);
        registry.insert("first_name", first_name::<L>);
        registry.insert("last_name", last_name::<L>);

        // internet
        registry.insert("email", email::<L>);
        registry.insert("free_email", free_email::<L>);
        registry.insert("user_name", user_name::<L>);
        registry.insert("ipv4", ipv4::<L>);
        registry.insert("ipv6", ipv6::<L>);
        registry.insert("domain_name", domain_name::<L>);
        registry.insert("uri", uri::<L>);

        // company / job
        registry.insert("company", company_name::<L>);
        registry.insert("bs", bs::<L>);
        registry.insert("catch_phrase", catch_phrase::<L>);
        registry.insert("job", job_title::<L>);

        // address
        registry.insert("street_name", street_name::<L>);
        registry.insert("street_address", street_address::<L>);
        registry.insert("city", city::<L>);
        registry.insert("postcode", postcode::<L>);
        registry.insert("state", state::<L>);
        registry.insert("country", country::<L>);
        registry.insert("country_code", country_code::<L>);
        registry.insert("country_calling_code", country_calling_code::<L>);
        registry.insert("address", full_address::<L>);
        registry.insert("language_code", language_code::<L>);
        registry.insert("language_name", language_name::<L>);

        // phone, currency, ssn
        registry.insert("phone_number", phone::<L>);
        registry.insert("currency_code", currency_code::<L>);
        registry.insert("currency_name", currency_name::<L>);
        registry.insert("ssn", ssn::<L>);

        // python / misc
        registry.insert("random_int", random_int::<L>);
        registry.insert("boolean", boolean::<L>);
        registry.insert("uuid4", uuid4::<L>);
        registry.insert("color", hex_color::<L>);

        // date_time
        registry.insert("date", date::<L>);
        registry.insert("date_of_birth", date_of_birth::<L>);

        // lorem
        registry.insert("word", word::<L>);
        registry.insert("sentence", sentence::<L>);
        registry.insert("paragraph", paragraph::<L>);
        registry.insert("text", text::<L>);

        Self { locale, registry }
    }
}

impl<L> GeneratorProvider for FakeProvider<L>
where
    L: Data + Copy + Send + Sync + 'static,
{
    fn generate(
        &self,
        method: &str,
        args: &GeneratorArgs,
        rng: &mut dyn RngCore,
    ) -> Result<Value, GeneratorError> {
        let generator = self
            .registry
            .get(method)
            .ok_or_else(|| GeneratorError::UnsupportedMethod(method.to_string()))?;
        generator(self.locale, args, rng)
    }

    fn supports(&self, method: &str) -> bool {
        self.registry.contains_key(method)
    }

    fn methods(&self) -> Vec<&'static str> {
        let mut methods: Vec<&'static str> = self.registry.keys().copied().collect();
        methods.sort_unstable();
        methods
    }
}

/// Typed access to keyword arguments, rejecting names a method does not take
struct ArgReader<'a> {
    method: &'static str,
    args: &'a GeneratorArgs,
}

impl<'a> ArgReader<'a> {
    fn new(
        method: &'static str,
        args: &'a GeneratorArgs,
        accepted: &[&str],
    ) -> Result<Self, GeneratorError> {
        if let Some(unexpected) = args.keys().find(|k| !accepted.contains(&k.as_str())) {
            return Err(invalid(method, unexpected, "unexpected argument"));
        }
        Ok(Self { method, args })
    }

    fn int(&self, name: &str, default: i64) -> Result<i64, GeneratorError> {
        match self.args.get(name) {
            None | Some(Value::Null) => Ok(default),
            Some(value) => value
                .as_i64()
                .ok_or_else(|| invalid(self.method, name, "expected an integer")),
        }
    }

    fn non_negative(&self, name: &str, default: i64) -> Result<u64, GeneratorError> {
        let value = self.int(name, default)?;
        u64::try_from(value).map_err(|_| invalid(self.method, name, "must not be negative"))
    }

    fn bounded(&self, name: &str, default: i64, max: u64) -> Result<u64, GeneratorError> {
        let value = self.non_negative(name, default)?;
        if value > max {
            return Err(invalid(
                self.method,
                name,
                &format!("must not be greater than {}", max),
            ));
        }
        Ok(value)
    }

    fn boolean(&self, name: &str, default: bool) -> Result<bool, GeneratorError> {
        match self.args.get(name) {
            None | Some(Value::Null) => Ok(default),
            Some(value) => value
                .as_bool()
                .ok_or_else(|| invalid(self.method, name, "expected a boolean")),
        }
    }

    fn string(&self, name: &str, default: &'a str) -> Result<&'a str, GeneratorError> {
        match self.args.get(name) {
            None | Some(Value::Null) => Ok(default),
            Some(value) => value
                .as_str()
                .ok_or_else(|| invalid(self.method, name, "expected a string")),
        }
    }
}

fn invalid(method: &str, argument: &str, reason: &str) -> GeneratorError {
    GeneratorError::InvalidArgument {
        method: method.to_string(),
        argument: argument.to_string(),
        reason: reason.to_string(),
    }
}

const MAX_WORDS: u64 = 10_000;
const MAX_SENTENCES: u64 = 1_000;
const MAX_TEXT_CHARS: u64 = 1_000_000;

/// Methods that take no arguments and map to a single `fake` string faker
macro_rules! string_fakers {
    ($($method:literal => $fn_name:ident => $faker:path;)+) => {
        $(
            fn $fn_name<L: Data + Copy>(
                locale: L,
                args: &GeneratorArgs,
                rng: &mut dyn RngCore,
            ) -> Result<Value, GeneratorError> {
                ArgReader::new($method, args, &[])?;
                Ok(Value::String($faker(locale).fake_with_rng::<String, _>(rng)))
            }
        )+
    };
}

string_fakers! {
    "name" => full_name => name::raw::Name;
    "first_name" => first_name => name::raw::FirstName;
    "last_name" => last_name => name::raw::LastName;
    "email" => email => internet::raw::SafeEmail;
    "free_email" => free_email => internet::raw::FreeEmail;
    "user_name" => user_name => internet::raw::Username;
    "ipv4" => ipv4 => internet::raw::IPv4;
    "ipv6" => ipv6 => internet::raw::IPv6;
    "company" => company_name => company::raw::CompanyName;
    "bs" => bs => company::raw::Bs;
    "catch_phrase" => catch_phrase => company::raw::CatchPhrase;
    "job" => job_title => job::raw::Title;
    "street_name" => street_name => address::raw::StreetName;
    "city" => city => address::raw::CityName;
    "postcode" => postcode => address::raw::PostCode;
    "state" => state => address::raw::StateName;
    "country" => country => address::raw::CountryName;
    "country_code" => country_code => address::raw::CountryCode;
    "phone_number" => phone => phone_number::raw::PhoneNumber;
    "currency_code" => currency_code => currency::raw::CurrencyCode;
    "currency_name" => currency_name => currency::raw::CurrencyName;
    "word" => word => lorem::raw::Word;
    "color" => hex_color => color::raw::HexColor;
}

fn domain<L: Data + Copy>(locale: L, rng: &mut dyn RngCore) -> String {
    let label: String = lorem::raw::Word(locale).fake_with_rng(rng);
    let suffix: String = internet::raw::DomainSuffix(locale).fake_with_rng(rng);
    format!("{}.{}", label.to_lowercase(), suffix)
}

fn domain_name<L: Data + Copy>(
    locale: L,
    args: &GeneratorArgs,
    rng: &mut dyn RngCore,
) -> Result<Value, GeneratorError> {
    ArgReader::new("domain_name", args, &[])?;
    Ok(json!(domain(locale, rng)))
}

fn uri<L: Data + Copy>(
    locale: L,
    args: &GeneratorArgs,
    rng: &mut dyn RngCore,
) -> Result<Value, GeneratorError> {
    ArgReader::new("uri", args, &[])?;
    let host = domain(locale, rng);
    let page: String = lorem::raw::Word(locale).fake_with_rng(rng);
    Ok(json!(format!("https://www.{}/{}", host, page.to_lowercase())))
}

fn street_line<L: Data + Copy>(locale: L, rng: &mut dyn RngCore) -> String {
    let number: String = address::raw::BuildingNumber(locale).fake_with_rng(rng);
    let street: String = address::raw::StreetName(locale).fake_with_rng(rng);
    format!("{} {}", number, street)
}

fn street_address<L: Data + Copy>(
    locale: L,
    args: &GeneratorArgs,
    rng: &mut dyn RngCore,
) -> Result<Value, GeneratorError> {
    ArgReader::new("street_address", args, &[])?;
    Ok(json!(street_line(locale, rng)))
}

fn full_address<L: Data + Copy>(
    locale: L,
    args: &GeneratorArgs,
    rng: &mut dyn RngCore,
) -> Result<Value, GeneratorError> {
    ArgReader::new("address", args, &[])?;
    let street = street_line(locale, rng);
    let postcode: String = address::raw::PostCode(locale).fake_with_rng(rng);
    let city: String = address::raw::CityName(locale).fake_with_rng(rng);
    Ok(json!(format!("{}\n{} {}", street, postcode, city)))
}

const LANGUAGES: &[(&str, &str)] = &[
    ("ar", "Arabic"),
    ("bn", "Bengali"),
    ("cs", "Czech"),
    ("da", "Danish"),
    ("de", "German"),
    ("el", "Greek"),
    ("en", "English"),
    ("es", "Spanish"),
    ("fi", "Finnish"),
    ("fr", "French"),
    ("he", "Hebrew"),
    ("hi", "Hindi"),
    ("hu", "Hungarian"),
    ("id", "Indonesian"),
    ("it", "Italian"),
    ("ja", "Japanese"),
    ("ko", "Korean"),
    ("nl", "Dutch"),
    ("no", "Norwegian"),
    ("pl", "Polish"),
    ("pt", "Portuguese"),
    ("ro", "Romanian"),
    ("ru", "Russian"),
    ("sv", "Swedish"),
    ("th", "Thai"),
    ("tr", "Turkish"),
    ("uk", "Ukrainian"),
    ("vi", "Vietnamese"),
    ("zh", "Chinese"),
];

const CALLING_CODES: &[&str] = &[
    "+1", "+7", "+20", "+27", "+30", "+31", "+32", "+33", "+34", "+36", "+39", "+40", "+41",
    "+43", "+44", "+45", "+46", "+47", "+48", "+49", "+52", "+55", "+61", "+64", "+81", "+82",
    "+86", "+90", "+91", "+351", "+353", "+354", "+358", "+966", "+971",
];

fn pick<'a, T>(items: &'a [T], rng: &mut dyn RngCore) -> &'a T {
    // Tables are non-empty constants
    &items[rng.gen_range(0..items.len())]
}

fn language_code<L: Data + Copy>(
    _locale: L,
    args: &GeneratorArgs,
    rng: &mut dyn RngCore,
) -> Result<Value, GeneratorError> {
    ArgReader::new("language_code", args, &[])?;
    Ok(json!(pick(LANGUAGES, rng).0))
}

fn language_name<L: Data + Copy>(
    _locale: L,
    args: &GeneratorArgs,
    rng: &mut dyn RngCore,
) -> Result<Value, GeneratorError> {
    ArgReader::new("language_name", args, &[])?;
    Ok(json!(pick(LANGUAGES, rng).1))
}

fn country_calling_code<L: Data + Copy>(
    _locale: L,
    args: &GeneratorArgs,
    rng: &mut dyn RngCore,
) -> Result<Value, GeneratorError> {
    ArgReader::new("country_calling_code", args, &[])?;
    Ok(json!(*pick(CALLING_CODES, rng)))
}

fn ssn<L: Data + Copy>(
    locale: L,
    args: &GeneratorArgs,
    rng: &mut dyn RngCore,
) -> Result<Value, GeneratorError> {
    ArgReader::new("ssn", args, &[])?;
    let value: String = number::raw::NumberWithFormat(locale, "^##-##-####").fake_with_rng(rng);
    Ok(json!(value))
}

fn random_int<L: Data + Copy>(
    _locale: L,
    args: &GeneratorArgs,
    rng: &mut dyn RngCore,
) -> Result<Value, GeneratorError> {
    let args = ArgReader::new("random_int", args, &["min", "max", "step"])?;
    let min = args.int("min", 0)?;
    let max = args.int("max", 9999)?;
    let step = args.int("step", 1)?;

    if min > max {
        return Err(invalid("random_int", "max", "must not be less than min"));
    }
    if step < 1 {
        return Err(invalid("random_int", "step", "must be at least 1"));
    }

    // Full i64 ranges span more than i64::MAX
    let steps = (i128::from(max) - i128::from(min)) / i128::from(step);
    let value = i128::from(min) + rng.gen_range(0..=steps) * i128::from(step);
    let value = i64::try_from(value).map_err(|_| invalid("random_int", "max", "range too large"))?;
    Ok(json!(value))
}

fn boolean<L: Data + Copy>(
    locale: L,
    args: &GeneratorArgs,
    rng: &mut dyn RngCore,
) -> Result<Value, GeneratorError> {
    let args = ArgReader::new("boolean", args, &["chance_of_getting_true"])?;
    let chance = args.int("chance_of_getting_true", 50)?;
    let ratio = u8::try_from(chance)
        .ok()
        .filter(|c| *c <= 100)
        .ok_or_else(|| invalid("boolean", "chance_of_getting_true", "must be between 0 and 100"))?;

    let value: bool = Boolean(locale, ratio).fake_with_rng(rng);
    Ok(json!(value))
}

fn uuid4<L: Data + Copy>(
    _locale: L,
    args: &GeneratorArgs,
    rng: &mut dyn RngCore,
) -> Result<Value, GeneratorError> {
    ArgReader::new("uuid4", args, &[])?;
    let bytes: [u8; 16] = rng.gen();
    Ok(json!(uuid::Builder::from_random_bytes(bytes).into_uuid().to_string()))
}

fn random_date_between(start: NaiveDate, end: NaiveDate, rng: &mut dyn RngCore) -> NaiveDate {
    let span = (end - start).num_days().max(0);
    let offset = rng.gen_range(0..=span);
    start + chrono::Duration::days(offset)
}

fn date<L: Data + Copy>(
    _locale: L,
    args: &GeneratorArgs,
    rng: &mut dyn RngCore,
) -> Result<Value, GeneratorError> {
    let args = ArgReader::new("date", args, &["pattern"])?;
    let pattern = args.string("pattern", "%Y-%m-%d")?;

    let items: Vec<Item<'_>> = StrftimeItems::new(pattern).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return Err(invalid("date", "pattern", "not a valid strftime pattern"));
    }

    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default();
    let today = Utc::now().date_naive();
    let value = random_date_between(epoch, today, rng);

    let mut formatted = String::new();
    write!(formatted, "{}", value.format_with_items(items.iter()))
        .map_err(|_| invalid("date", "pattern", "pattern needs more than a calendar date"))?;
    Ok(json!(formatted))
}

fn date_of_birth<L: Data + Copy>(
    _locale: L,
    args: &GeneratorArgs,
    rng: &mut dyn RngCore,
) -> Result<Value, GeneratorError> {
    let args = ArgReader::new("date_of_birth", args, &["minimum_age", "maximum_age"])?;
    let minimum_age = args.non_negative("minimum_age", 0)?;
    let maximum_age = args.non_negative("maximum_age", 115)?;
    if minimum_age > maximum_age {
        return Err(invalid(
            "date_of_birth",
            "maximum_age",
            "must not be less than minimum_age",
        ));
    }

    let months = |years: u64| {
        u32::try_from(years.saturating_mul(12))
            .map(Months::new)
            .map_err(|_| invalid("date_of_birth", "maximum_age", "too large"))
    };

    let today = Utc::now().date_naive();
    // Oldest birthday: one day after `maximum_age + 1` years ago
    let earliest = today
        .checked_sub_months(months(maximum_age + 1)?)
        .and_then(|d| d.succ_opt())
        .ok_or_else(|| invalid("date_of_birth", "maximum_age", "out of calendar range"))?;
    let latest = today
        .checked_sub_months(months(minimum_age)?)
        .ok_or_else(|| invalid("date_of_birth", "minimum_age", "out of calendar range"))?;

    let value = random_date_between(earliest, latest, rng);
    Ok(json!(value.format("%Y-%m-%d").to_string()))
}

fn make_sentence<L: Data + Copy>(
    locale: L,
    nb_words: u64,
    variable: bool,
    rng: &mut dyn RngCore,
) -> String {
    if nb_words == 0 {
        return String::new();
    }

    let count: u64 = if variable {
        let low = (nb_words.saturating_mul(60) / 100).max(1);
        let high = (nb_words.saturating_mul(140) / 100).max(low);
        rng.gen_range(low..=high)
    } else {
        nb_words
    };
    let count = count as usize;

    let words: Vec<String> = lorem::raw::Words(locale, count..count + 1).fake_with_rng(rng);
    let mut sentence = words.join(" ");
    if let Some(first) = sentence.chars().next() {
        let upper: String = first.to_uppercase().collect();
        sentence.replace_range(..first.len_utf8(), &upper);
    }
    sentence.push('.');
    sentence
}

fn sentence<L: Data + Copy>(
    locale: L,
    args: &GeneratorArgs,
    rng: &mut dyn RngCore,
) -> Result<Value, GeneratorError> {
    let args = ArgReader::new("sentence", args, &["nb_words", "variable_nb_words"])?;
    let nb_words = args.bounded("nb_words", 6, MAX_WORDS)?;
    let variable = args.boolean("variable_nb_words", true)?;
    Ok(json!(make_sentence(locale, nb_words, variable, rng)))
}

fn paragraph<L: Data + Copy>(
    locale: L,
    args: &GeneratorArgs,
    rng: &mut dyn RngCore,
) -> Result<Value, GeneratorError> {
    let args = ArgReader::new("paragraph", args, &["nb_sentences"])?;
    let nb_sentences = args.bounded("nb_sentences", 3, MAX_SENTENCES)?;

    let sentences: Vec<String> = (0..nb_sentences)
        .map(|_| make_sentence(locale, 6, true, rng))
        .collect();
    Ok(json!(sentences.join(" ")))
}

fn text<L: Data + Copy>(
    locale: L,
    args: &GeneratorArgs,
    rng: &mut dyn RngCore,
) -> Result<Value, GeneratorError> {
    let args = ArgReader::new("text", args, &["max_nb_chars"])?;
    let max_chars = args.bounded("max_nb_chars", 200, MAX_TEXT_CHARS)? as usize;
    if max_chars < 5 {
        return Err(invalid("text", "max_nb_chars", "must be at least 5"));
    }

    let mut text = String::new();
    let mut length = 0;
    loop {
        let next = make_sentence(locale, 6, true, rng);
        let next_length = next.chars().count();
        let separator = usize::from(!text.is_empty());
        if length + separator + next_length > max_chars {
            if text.is_empty() {
                // A single sentence is already too long: cut it at a char boundary
                text = next.chars().take(max_chars - 1).collect::<String>();
                text = text.trim_end().to_string();
                text.push('.');
            }
            break;
        }
        if separator == 1 {
            text.push(' ');
        }
        text.push_str(&next);
        length += separator + next_length;
    }
    Ok(json!(text))
}
