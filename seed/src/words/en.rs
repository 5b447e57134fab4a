&[
  "abbey", "abduct", "ability", "ablaze", "abnormal", "aboard", "absorb", "abyss", "academy",
  "accent", "achieve", "acidic", "acorn", "acquire", "across", "acting", "acumen", "adapt",
  "addicted", "adhesive", "adjust", "admire", "adopt", "adrenalin", "adult", "advance", "aeon",
  "aerial", "afar", "affair", "afield", "afloat", "afraid", "after", "again", "agenda",
  "aggravate", "agile", "agleam", "agnostic", "agony", "agreed", "ahead", "ahoy", "ailment",
  "aimless", "airport", "aisle", "ajar", "akin", "alarm", "album", "alchemy", "alert", "algebra",
  "alien", "alkaline", "almost", "aloof", "alpine", "already", "also", "altitude", "alumni",
  "always", "amaze", "ambush", "amend", "amidst", "amnesty", "amply", "amused", "anchor",
  "android", "anecdote", "angle", "anime", "ankle", "announce", "answer", "antics", "anvil",
  "anxiety", "apart", "apex", "aphid", "aplomb", "apology", "appear", "apricot", "aptitude",
  "aquarium", "arbitrary", "archer", "ardent", "argue", "arid", "army", "around", "arrow",
  "arson", "artistic", "ascend", "ashtray", "aside", "asked", "asleep", "aspire", "asthma",
  "asylum", "atlas", "atom", "attire", "auburn", "auction", "audio", "august", "aunt", "author",
  "avatar", "avidly", "awaken", "awesome", "awful", "awkward", "awning", "axes", "axiom", "axle",
  "azure", "baby", "bacon", "badge", "bailiff", "baked", "balance", "bamboo", "banjo", "baptism",
  "barbecue", "basin", "batch", "bawled", "baying", "bazaar", "beaker", "bed", "beer", "befit",
  "begun", "behind", "being", "believe", "bemused", "benches", "berries", "bested", "betting",
  "bevel", "beyond", "bias", "bib", "bicycle", "bids", "bifocals", "biggest", "bikini",
  "bimonthly", "binocular", "biology", "biplane", "biscuit", "bite", "biweekly", "blanket",
  "blender", "blip", "bloom", "bluntly", "boat", "bobsled", "bodies", "bogeys", "boil", "bomb",
  "bone", "book", "bop", "border", "boss", "both", "bounced", "bovine", "bowling", "boxes",
  "boyfriend", "bracelet", "brick", "broad", "brunt", "bubble", "buckets", "budget", "buffet",
  "bugs", "building", "bulb", "bumper", "bunch", "bur", "butter", "buying", "buzzer", "cabin",
  "cactus", "cadets", "cafe", "cage", "cajoling", "cake", "calamity", "camp", "cap", "car",
  "casket", "catch", "cause", "cavernous", "cease", "cedar", "ceiling", "cell", "cement", "cent",
  "certain", "cheese", "chief", "chlorine", "chop", "chrome", "chuck", "cider", "cigar",
  "cinema", "circle", "cistern", "citadel", "civilian", "clean", "click", "cloak", "clue",
  "coal", "cobra", "cocoa", "code", "coexist", "coffee", "cogs", "coherent", "colony", "comb",
  "cone", "cool", "copy", "corrode", "costume", "cottage", "cousin", "cover", "cowl", "crab",
  "cream", "croak", "crumb", "cry", "cube", "cucumber", "cuddled", "cue", "cuffs", "cuisine",
  "cult", "cunning", "cupcake", "cur", "cut", "cyan", "cycling", "dab", "daft", "dagger",
  "daily", "dale", "damp", "dangerous", "dapper", "darted", "dash", "dauntless", "dawn",
  "daytime", "dazed", "deal", "debut", "decay", "dedicated", "deepest", "deftly", "degrees",
  "dehydrate", "dejected", "delayed", "demonstrate", "dented", "deodorant", "depth", "desk",
  "devoid", "dewdrop", "dexterity", "dialect", "dice", "different", "dilute", "dime", "dinner",
  "diode", "diplomat", "directed", "dismount", "ditch", "divers", "dizzy", "doctor", "dodge",
  "does", "doing", "dolphin", "domestic", "donuts", "doorway", "dormant", "dosage", "dotted",
  "double", "dove", "down", "dozen", "dreams", "drinks", "drowning", "drunk", "dry", "dual",
  "dubbed", "duckling", "dude", "duets", "dug", "duke", "dull", "dunes", "duplex", "duration",
  "dusted", "duties", "dwarf", "dwelt", "dwindling", "dye", "dying", "dynamite", "dyslexic",
  "each", "earth", "easy", "eating", "eave", "ebb", "ebony", "eccentric", "echo", "eclipse",
  "ecstatic", "edgy", "editor", "eel", "eerie", "effort", "egg", "egotistic", "eight", "either",
  "ejector", "elapse", "elbow", "eldest", "eleven", "elite", "elope", "else", "eluded", "emails",
  "ember", "emcee", "emerge", "emit", "emotion", "empty", "emu", "enamel", "enchanted",
  "enforce", "enhanced", "enigma", "enjoy", "enmity", "enough", "enraged", "ensign", "entrance",
  "envy", "eon", "epoxy", "equip", "erected", "erg", "erosion", "error", "eskimos", "espionage",
  "essential", "estate", "etched", "eternal", "ethics", "etiquette", "evenings", "evicted",
  "evolved", "ewe", "exam", "except", "exhale", "exit", "exotic", "expire", "exquisite", "extra",
  "exult", "fables", "factual", "fading", "fainted", "faked", "fall", "family", "fancy",
  "farming", "fast", "fatal", "faulty", "fawns", "fazed", "feast", "february", "federal", "feel",
  "feline", "females", "fences", "ferry", "festival", "fetches", "feud", "fewest", "fiat",
  "fibula", "fictional", "fidget", "fierce", "fifteen", "figment", "filming", "finish", "firm",
  "fishing", "fitting", "fixate", "fizzle", "flag", "fleet", "flippant", "float", "flu",
  "flying", "foamy", "focus", "foes", "foggy", "foiled", "fonts", "foolish", "fop", "for",
  "fossil", "fountain", "fowls", "foxes", "foyer", "framed", "free", "friendly", "fruit",
  "frying", "fudge", "fuel", "fugitive", "fully", "fuming", "fundamental", "furnished",
  "fuselage", "future", "fuzzy", "gables", "gaff", "gags", "gained", "galaxy", "gambit", "gang",
  "gap", "garb", "gasp", "gather", "gauze", "gave", "gawk", "gearbox", "gecko", "geek", "gels",
  "gemstone", "general", "geometry", "germs", "gesture", "getting", "geyser", "ghetto", "ghost",
  "giddy", "gifts", "gigantic", "gills", "gimmick", "ginger", "girth", "gist", "giving", "glass",
  "gleeful", "glide", "glue", "gnaw", "gnome", "goat", "goblet", "godfather", "goes", "goggles",
  "going", "gold", "gone", "good", "gopher", "gossip", "gotten", "gourmet", "governing", "gown",
  "grab", "great", "grid", "groan", "grunt", "guarded", "guest", "guide", "gumball", "gun",
  "guru", "gusts", "gutter", "guys", "gymnast", "gypsy", "gyrate", "habitat", "hacksaw",
  "haggled", "half", "hamburger", "hand", "happens", "hard", "hashing", "hatchet", "haunted",
  "having", "hawk", "haystack", "hazard", "heavy", "hedgehog", "heed", "hefty", "hegemony",
  "heights", "held", "hemlock", "hence", "heron", "hesitate", "hew", "hexagonal", "hickory",
  "highway", "hijack", "hiker", "hills", "himself", "hinder", "hippo", "hire", "history",
  "hitched", "hive", "hoard", "hobby", "hoe", "hog", "hoisting", "hold", "home", "honked",
  "hookup", "hope", "horns", "hospital", "hotel", "hounded", "howls", "hubcaps", "huddle", "hue",
  "huff", "huge", "hull", "humid", "hunter", "hurried", "husband", "huts", "hybrid", "hymn",
  "hyper", "iceberg", "icing", "icon", "idea", "idiom", "idled", "idols", "igloo", "ignore",
  "iguana", "illness", "imbalance", "imitate", "impel", "inactive", "inbound", "incur",
  "industrial", "inexact", "inflamed", "ingested", "inherit", "initiate", "inkling", "inline",
  "inmate", "innocent", "inorganic", "input", "inquest", "insult", "intended", "inundate",
  "invoke", "inwardly", "ionic", "ire", "iris", "irk", "irony", "irritate", "island", "isolated",
  "issued", "italics", "itches", "items", "itinerary", "itself", "ivy", "jabbed", "jackets",
  "jaded", "jagged", "jailed", "jamming", "janitor", "jargon", "jaunt", "jaws", "jay", "jeans",
  "jeers", "jellyfish", "jeopardy", "jerseys", "jester", "jetting", "jewels", "jigsaw", "jilt",
  "jingle", "jittery", "jive", "jockey", "jogger", "joining", "joking", "jolted", "jostle",
  "jot", "journal", "joyous", "jubilee", "judge", "juggled", "juicy", "july", "jump", "junk",
  "jury", "justice", "jut", "juvenile", "kangaroo", "karate", "keep", "keg", "kelp", "kennel",
  "kernels", "kettle", "keyboard", "kickoff", "kidneys", "kilogram", "king", "kiosk", "kisses",
  "kitchens", "kiwi", "knapsack", "knife", "knowledge", "koala", "kudos", "lab", "lace",
  "lagoon", "lair", "lakes", "lamb", "language", "laptop", "large", "later", "laud", "lava",
  "law", "lax", "layout", "lazy", "lead", "lectures", "ledge", "leech", "left", "legion",
  "lemon", "lending", "leopard", "lesson", "lettuce", "level", "lewd", "liar", "library",
  "licks", "lids", "lied", "ligament", "likewise", "lilac", "limits", "linen", "lion",
  "lipstick", "liquid", "listen", "litter", "lively", "loaded", "lobster", "lodge", "loftiest",
  "logic", "loincloth", "loll", "long", "looking", "lopped", "lordship", "losing", "lottery",
  "loudly", "love", "loyal", "lub", "lucky", "luggage", "lukewarm", "lullaby", "lumber", "lunar",
  "lurk", "lush", "lute", "luxury", "lymph", "lynx", "lyrics", "macro", "madness", "magically",
  "maimed", "majesty", "making", "malady", "mammal", "manual", "mapped", "masterful", "match",
  "maul", "maverick", "maw", "maximum", "mayor", "maze", "meant", "mechanic", "medicate",
  "meeting", "megabyte", "melting", "memoir", "menu", "merger", "mesh", "metro", "mews", "mice",
  "midst", "mien", "mighty", "mild", "mime", "mirror", "misery", "mittens", "mixture", "moat",
  "mobile", "mocked", "mode", "mohawk", "moisture", "molten", "moment", "moon", "mops", "morsel",
  "mostly", "motherly", "mouth", "movement", "mowing", "much", "muddy", "muffin", "mugged",
  "mullet", "mundane", "muppet", "mural", "muse", "mute", "muzzle", "myriad", "mystery", "myth",
  "nabbing", "nagged", "nail", "names", "napkin", "narrate", "nasty", "navy", "nearby",
  "necklace", "needed", "negative", "neither", "neon", "nephew", "nerves", "network", "neutral",
  "never", "newt", "nexus", "nibs", "nicest", "nifty", "nightly", "nil", "nimbly", "nineteen",
  "nip", "nobody", "nocturnal", "nodes", "noises", "nomad", "nook", "nor", "nose", "noted",
  "nouns", "novelty", "nowhere", "nozzle", "nub", "nucleus", "nudged", "nugget", "nuisance",
  "null", "number", "nuns", "nurse", "nutshell", "nylon", "oaks", "oasis", "oat", "obedient",
  "object", "obliged", "obnoxious", "observant", "obtains", "obvious", "occur", "ocean",
  "october", "odds", "odometer", "offend", "often", "ogle", "ohm", "oilfield", "ointment",
  "older", "olive", "olympics", "omega", "omission", "omnibus", "oncoming", "onefold", "onion",
  "online", "onslaught", "onto", "onward", "ooze", "opacity", "opened", "opposite", "optical",
  "opus", "orbit", "orchid", "orders", "ore", "organs", "origin", "ornament", "orphans", "oscar",
  "others", "otter", "ouch", "oust", "outbreak", "ovation", "oven", "owed", "owls", "owner",
  "oxen", "oxidant", "oxygen", "oyster", "ozone", "pact", "pager", "paid", "palace", "pamphlet",
  "pancakes", "paper", "par", "pastry", "patio", "pause", "pavements", "pawnshop", "payment",
  "pebbles", "peculiar", "pedantic", "peeled", "pegs", "pelican", "pencil", "people", "pepper",
  "perk", "pests", "petals", "phase", "pheasants", "phone", "phrases", "physics", "piano",
  "picked", "pierce", "pigment", "pike", "piloted", "pimple", "pinched", "pipeline", "pirate",
  "pistons", "pitched", "pivot", "pixels", "pizza", "playful", "pledge", "pliers", "plotting",
  "plus", "plywood", "pockets", "podcast", "poetry", "point", "poker", "polar", "ponies", "pool",
  "popular", "portents", "possible", "potato", "pouch", "pram", "present", "pride", "problems",
  "pruned", "prying", "psychic", "public", "puck", "puddle", "puffin", "pug", "pump", "punch",
  "pupils", "purged", "push", "putty", "puzzled", "pylons", "pyramid", "python", "quack",
  "queen", "quick", "rabbits", "racetrack", "radar", "rafts", "rage", "railway", "rake", "rally",
  "ramped", "randomly", "rapid", "rarest", "rash", "raving", "raw", "rays", "razor", "react",
  "rebel", "recipe", "reduce", "reef", "refer", "regular", "reheat", "rejoices", "rekindle",
  "relic", "remedy", "renting", "reorder", "repent", "reruns", "rest", "return", "reunion",
  "revamp", "rewind", "rhythm", "ribbon", "richly", "ridges", "rift", "rigid", "rims", "ringing",
  "riots", "ripped", "rising", "ritual", "river", "robot", "rockets", "rodent", "roe", "rogue",
  "roles", "romance", "roomy", "roped", "roster", "rotate", "rounded", "rowboat", "royal",
  "ruby", "rudely", "rue", "ruffled", "rugged", "ruined", "ruling", "rumble", "runway", "rural",
  "rustled", "rye", "sabotage", "sack", "sadness", "safety", "saga", "sailor", "sake", "salads",
  "sample", "sanity", "sapling", "sarcasm", "satin", "saucepan", "saved", "sawmill", "saxophone",
  "sayings", "scamper", "scenic", "school", "science", "scoop", "scrub", "scuba", "second",
  "sedan", "seeded", "segments", "seismic", "selfish", "semifinal", "sensible", "september",
  "sequence", "serving", "session", "seventh", "sewage", "shackles", "shelter", "shipped",
  "shocking", "shrugged", "shuffled", "shyness", "siblings", "sickness", "sidekick", "sieve",
  "sighting", "silk", "simplest", "sincerely", "sipped", "siren", "sister", "sitting", "sixteen",
  "sizes", "skater", "skew", "skirting", "skyscraper", "slackens", "sleepless", "slid", "slower",
  "slug", "sly", "smash", "smelting", "smidgen", "smog", "smuggled", "sneeze", "sniff", "snout",
  "snug", "soapy", "sober", "soccer", "soda", "software", "soggy", "soil", "solved", "somewhere",
  "soothe", "sop", "sorry", "southern", "sovereign", "sowed", "soya", "space", "speedy",
  "sphere", "spiders", "splendid", "spout", "spud", "spying", "square", "stacking", "stellar",
  "stick", "stockpile", "strained", "stunning", "stylishly", "suave", "subtly", "suddenly",
  "sue", "suffice", "sugar", "suitcase", "sulking", "summon", "sunken", "superior", "surfer",
  "sushi", "suture", "swagger", "swiftly", "sword", "swung", "syllabus", "symptoms", "syndrome",
  "syringe", "system", "taboo", "tacit", "tadpoles", "tagged", "tail", "talent", "tamper",
  "tanks", "tapestry", "tarred", "tasked", "tattoo", "taunts", "tavern", "tawny", "taxi",
  "teardrop", "technical", "teeming", "tell", "template", "tender", "tepid", "tequila",
  "terminal", "testing", "tether", "textbook", "thaw", "theatrics", "thorn", "threaten",
  "thumbs", "thwart", "tick", "tidy", "tiers", "tiff", "tiger", "tilt", "timber", "tinted",
  "tipsy", "tissue", "titans", "toaster", "tobacco", "today", "toenail", "toffee", "together",
  "toilet", "tolerant", "tomorrow", "tonic", "took", "torch", "tossed", "totem", "touchy",
  "towel", "toxic", "toyed", "trash", "trendy", "tribal", "trolling", "truth", "tsunami",
  "tubes", "tucks", "tudor", "tuesday", "tufts", "tugs", "tuition", "tulips", "tumbling",
  "tunnel", "turnip", "tusks", "tuxedo", "twang", "tweezers", "twice", "twofold", "tycoon",
  "tyke", "typist", "tyrant", "udder", "ugly", "ulcers", "ultimate", "umpire", "unafraid",
  "unbending", "uncanny", "under", "uneven", "unfit", "ungainly", "unhappy", "unison",
  "unjustly", "unknown", "unlikely", "unnoticed", "unopened", "unplugs", "unquoted", "unrest",
  "unsafe", "until", "unusual", "unveil", "unwind", "unzip", "upbeat", "update", "upgrade",
  "uphill", "upkeep", "upload", "upon", "upper", "upright", "upstairs", "uptight", "upwards",
  "urban", "urchins", "urn", "usage", "useful", "usher", "using", "usual", "utensils", "utility",
  "utmost", "utopia", "uttered", "vacation", "vague", "value", "vampire", "vane", "vapidly",
  "vary", "vastness", "vats", "vaults", "veal", "vector", "veered", "vegan", "vein", "velvet",
  "venomous", "verification", "vessel", "veteran", "vexed", "vials", "vibrate", "victim",
  "video", "viewpoint", "vigilant", "village", "vinegar", "violin", "vipers", "virtual",
  "visited", "vitals", "vivacious", "vixen", "vocal", "voe", "vogue", "voice", "vortex", "vote",
  "voucher", "vowels", "voyage", "vulture", "wade", "waffle", "wagtail", "waist", "waking",
  "wallets", "warped", "washing", "water", "waveform", "waxed", "wayside", "weavers", "website",
  "wedge", "weekday", "weird", "welders", "went", "were", "western", "wetsuit", "whale", "when",
  "which", "whole", "why", "wickets", "width", "wielded", "wife", "wiggle", "winter", "wipeout",
  "wiring", "wise", "withdrawn", "wives", "wizard", "woad", "wobbly", "woes", "woken", "wolf",
  "womanly", "woozy", "worry", "wounded", "woven", "wrap", "wreak", "wrist", "wrong", "wry",
  "yacht", "yahoo", "yak", "yanks", "yap", "yard", "yawning", "yearbook", "yellow", "yen",
  "yesterday", "yeti", "yew", "yields", "yodel", "yoga", "yolk", "yon", "yore", "younger",
  "yowl", "yoyo", "yule", "zany", "zapped", "zeal", "zebra", "zero", "zesty", "zinger",
  "zippers", "zodiac", "zombie", "zones", "zoom",
]
